#![allow(dead_code)]

use std::collections::HashMap;

use blockfall::core::scoring::level_for_score;
use blockfall::core::{
    Feedback, GameConfig, GameSession, HighScore, MemoryStore, NoFeedback, NullRenderer,
    PlayerProgress, Renderer, RepeatGuard, SaveState, ShapeDistribution, ShapeInfo, ShapeRecord,
};
use blockfall::types::{CellColor, GamePhase, ShapeKind, TipSlot};

/// `rows`x10 board that only ever deals O pieces
pub fn only_o(rows: u16) -> GameConfig {
    GameConfig::with_board(rows, 10)
        .with_seed(42)
        .with_distribution(ShapeDistribution::Weighted([0, 0, 0, 1, 0, 0, 0]))
        .with_repeat_guard(RepeatGuard::Off)
}

/// A save for `config` with the cells chosen by `fill` settled and an O piece at birth.
pub fn preset(config: &GameConfig, score: u32, fill: impl Fn(usize, usize) -> bool) -> SaveState {
    let fresh =
        GameSession::new(config.clone(), NullRenderer, MemoryStore::new(), NoFeedback).unwrap();
    let mut state = fresh.save_state();
    for (row, values) in state.play_area_colors.iter_mut().enumerate() {
        for (col, value) in values.iter_mut().enumerate() {
            if fill(row, col) {
                *value = 2;
            }
        }
    }
    state.score = score;
    state.level = level_for_score(score);
    if score > state.highest_score.score {
        state.highest_score = HighScore::now(score);
    }
    state.shape = ShapeRecord {
        color_index: 1,
        kind: ShapeKind::O.index() as i64,
    };
    state
}

/// Counts line-clear feedback.
#[derive(Debug, Default)]
pub struct Bell {
    pub rings: u32,
}

impl Feedback for Bell {
    fn on_line_clear_success(&mut self) {
        self.rings += 1;
    }
}

/// Remembers the last colour painted at every cell plus HUD calls.
#[derive(Debug, Default)]
pub struct Recorder {
    pub cells: HashMap<(usize, usize), CellColor>,
    pub paints: usize,
    pub tips: [Option<ShapeKind>; 2],
    pub phases: Vec<GamePhase>,
    pub scores: Vec<u32>,
}

impl Recorder {
    pub fn at(&self, row: usize, col: usize) -> CellColor {
        self.cells
            .get(&(row, col))
            .copied()
            .unwrap_or(CellColor::Background)
    }
}

impl Renderer for Recorder {
    fn set_cell_color(&mut self, row: usize, col: usize, color: CellColor) {
        self.paints += 1;
        self.cells.insert((row, col), color);
    }

    fn show_tip(&mut self, slot: TipSlot, shape: &ShapeInfo) {
        let index = match slot {
            TipSlot::One => 0,
            TipSlot::Two => 1,
        };
        self.tips[index] = Some(shape.kind());
    }

    fn show_progress(&mut self, progress: &PlayerProgress) {
        self.scores.push(progress.score());
    }

    fn show_phase(&mut self, phase: GamePhase) {
        self.phases.push(phase);
    }
}
