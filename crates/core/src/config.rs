//! Session configuration.
//!
//! Defaults reproduce the classic layout: a 10-column board with 20 playable rows and
//! 4 spawn rows on top, a death line on the highest playable row and a 7-colour palette.

use crate::error::GameError;
use crate::types::{
    Position, DEFAULT_SHAPE_WEIGHTS, BOARD_COLUMNS, MOVE_REPEAT_INTERVAL_MS, PALETTE_SIZE,
    PLAY_ROWS, SOFT_DROP_INTERVAL_MS, SPAWN_ROWS,
};

/// How the next shape kind is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeDistribution {
    Uniform,
    /// Relative weights in `ShapeKind::ALL` order; at least one must be non-zero.
    Weighted([u32; 7]),
}

impl Default for ShapeDistribution {
    fn default() -> Self {
        ShapeDistribution::Weighted(DEFAULT_SHAPE_WEIGHTS)
    }
}

/// Reroll rule applied when generating the newest tip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatGuard {
    Off,
    /// Reroll while the candidate equals both pieces it will follow (no three in a row).
    #[default]
    NoTriple,
    /// Reroll while the candidate equals either of them.
    NoDouble,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub rows: u16,
    pub columns: u16,
    /// A locked piece with any cell above this row ends the game.
    pub death_line_row: u16,
    pub palette_size: u8,
    pub distribution: ShapeDistribution,
    pub repeat_guard: RepeatGuard,
    /// Fixed seed for the shape generator; `None` seeds from the OS.
    pub seed: Option<u64>,
    pub soft_drop_interval_ms: u32,
    pub move_repeat_interval_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: PLAY_ROWS + SPAWN_ROWS,
            columns: BOARD_COLUMNS,
            death_line_row: PLAY_ROWS - 1,
            palette_size: PALETTE_SIZE,
            distribution: ShapeDistribution::default(),
            repeat_guard: RepeatGuard::default(),
            seed: None,
            soft_drop_interval_ms: SOFT_DROP_INTERVAL_MS,
            move_repeat_interval_ms: MOVE_REPEAT_INTERVAL_MS,
        }
    }
}

impl GameConfig {
    /// A board of the given size with the death line on its top row.
    pub fn with_board(rows: u16, columns: u16) -> Self {
        Self {
            rows,
            columns,
            death_line_row: rows.saturating_sub(1),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_death_line(mut self, row: u16) -> Self {
        self.death_line_row = row;
        self
    }

    pub fn with_distribution(mut self, distribution: ShapeDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_repeat_guard(mut self, guard: RepeatGuard) -> Self {
        self.repeat_guard = guard;
        self
    }

    /// Anchor position of every newly created piece.
    pub fn birth_position(&self) -> Position {
        Position::new(i32::from(self.rows) - 2, i32::from(self.columns) / 2)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        // Shapes reach one row below and two columns right of the birth anchor.
        if self.rows < 4 {
            return Err(GameError::InvalidConfig(format!(
                "need at least 4 rows, got {}",
                self.rows
            )));
        }
        if self.columns < 5 {
            return Err(GameError::InvalidConfig(format!(
                "need at least 5 columns, got {}",
                self.columns
            )));
        }
        if self.death_line_row >= self.rows {
            return Err(GameError::InvalidConfig(format!(
                "death line {} must be below row count {}",
                self.death_line_row, self.rows
            )));
        }
        if self.palette_size == 0 {
            return Err(GameError::InvalidConfig("palette is empty".into()));
        }
        if let ShapeDistribution::Weighted(weights) = self.distribution {
            if weights.iter().all(|&w| w == 0) {
                return Err(GameError::InvalidConfig("all shape weights are zero".into()));
            }
        }
        if self.soft_drop_interval_ms == 0 || self.move_repeat_interval_ms == 0 {
            return Err(GameError::InvalidConfig("repeat intervals must be non-zero".into()));
        }
        Ok(())
    }
}
