//! Save state - the persisted game layout and its validation
//!
//! Field names serialize in camelCase (`playAreaColors`, `tipOne`, ...). `playAreaColors`
//! is indexed `[row][col]` with row 0 at the bottom; `-1` is background. Shape kinds are
//! integers in declaration order (I=0 ... Z=6).
//!
//! A save is decoded completely before any of it is applied, so a rejected save never
//! leaves a half-restored session behind.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::grid::Grid;
use crate::piece::kind_from_index;
use crate::scoring::{HighScore, PlayerProgress};
use crate::spawn::{ShapeInfo, SpawnQueue};
use crate::types::{Cell, ColorId, ShapeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    pub color_index: i32,
    #[serde(rename = "type")]
    pub kind: i64,
}

impl From<&ShapeInfo> for ShapeRecord {
    fn from(shape: &ShapeInfo) -> Self {
        Self {
            color_index: i32::from(shape.color().0),
            kind: shape.kind().index() as i64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveState {
    /// Informational; the level is recomputed from `score` on restore.
    pub level: u32,
    pub score: u32,
    pub is_game_over: bool,
    pub highest_score: HighScore,
    pub play_area_colors: Vec<Vec<i32>>,
    pub shape: ShapeRecord,
    pub tip_one: ShapeRecord,
    pub tip_two: ShapeRecord,
}

/// A save that passed validation, ready to be applied
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredGame {
    pub grid: Grid,
    pub score: u32,
    pub best: HighScore,
    pub game_over: bool,
    pub shapes: [(ShapeKind, ColorId); 3],
}

impl SaveState {
    /// Capture the persistent parts of a session.
    pub fn capture(
        grid: &Grid,
        progress: &PlayerProgress,
        queue: &SpawnQueue,
        game_over: bool,
    ) -> Self {
        let play_area_colors = (0..grid.rows())
            .map(|row| grid.row(row).iter().map(Cell::to_save_index).collect())
            .collect();
        Self {
            level: progress.level(),
            score: progress.score(),
            is_game_over: game_over,
            highest_score: progress.best().clone(),
            play_area_colors,
            shape: queue.active().into(),
            tip_one: queue.tip_one().into(),
            tip_two: queue.tip_two().into(),
        }
    }

    /// Check the save against `config` and decode it.
    ///
    /// Wrong dimensions and out-of-palette colours are `CorruptSave`; an unknown shape
    /// kind is `InvalidShapeKind`.
    pub fn decode(&self, config: &GameConfig) -> Result<RestoredGame, GameError> {
        let rows = usize::from(config.rows);
        let columns = usize::from(config.columns);

        if self.play_area_colors.len() != rows {
            return Err(GameError::corrupt(format!(
                "expected {rows} rows, found {}",
                self.play_area_colors.len()
            )));
        }

        let mut grid = Grid::with_death_line(rows, columns, usize::from(config.death_line_row));
        for (row, values) in self.play_area_colors.iter().enumerate() {
            if values.len() != columns {
                return Err(GameError::corrupt(format!(
                    "row {row}: expected {columns} columns, found {}",
                    values.len()
                )));
            }
            for (col, &value) in values.iter().enumerate() {
                let cell = decode_cell(value, config.palette_size).ok_or_else(|| {
                    GameError::corrupt(format!("row {row}, col {col}: bad colour index {value}"))
                })?;
                grid.set_color(row, col, cell);
            }
        }

        let shapes = [
            decode_shape(&self.shape, config.palette_size, "shape")?,
            decode_shape(&self.tip_one, config.palette_size, "tipOne")?,
            decode_shape(&self.tip_two, config.palette_size, "tipTwo")?,
        ];

        Ok(RestoredGame {
            grid,
            score: self.score,
            best: self.highest_score.clone(),
            game_over: self.is_game_over,
            shapes,
        })
    }
}

fn decode_cell(value: i32, palette_size: u8) -> Option<Cell> {
    match value {
        -1 => Some(Cell::Empty),
        v if v >= 0 && v < i32::from(palette_size) => Some(Cell::Filled(ColorId(v as u8))),
        _ => None,
    }
}

fn decode_shape(
    record: &ShapeRecord,
    palette_size: u8,
    slot: &str,
) -> Result<(ShapeKind, ColorId), GameError> {
    let kind = kind_from_index(record.kind)?;
    match decode_cell(record.color_index, palette_size) {
        Some(Cell::Filled(color)) => Ok((kind, color)),
        _ => Err(GameError::corrupt(format!(
            "{slot}: bad colour index {}",
            record.color_index
        ))),
    }
}
