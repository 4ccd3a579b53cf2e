//! Owned, read-only views of the session for observers and renderers

use crate::grid::Grid;
use crate::piece::Piece;
use crate::types::{Cell, GamePhase, Position, RotationState, ShapeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: ShapeKind,
    pub rotation: RotationState,
    pub cells: [Position; 4],
}

impl From<&Piece> for ActiveSnapshot {
    fn from(value: &Piece) -> Self {
        Self {
            kind: value.kind(),
            rotation: value.rotation(),
            cells: value.cells(),
        }
    }
}

/// Owned, render-ready copy of a session's observable state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub rows: usize,
    pub columns: usize,
    /// Settled cells, row-major with row 0 at the bottom
    pub board: Vec<Cell>,
    pub active: Option<ActiveSnapshot>,
    pub ghost: Option<[Position; 4]>,
    pub tips: [ShapeKind; 2],
    pub phase: GamePhase,
    pub score: u32,
    pub level: u32,
    pub best_score: u32,
    pub gravity_interval_ms: u32,
}

impl GameSnapshot {
    pub(crate) fn board_from(grid: &Grid) -> Vec<Cell> {
        grid.cells().to_vec()
    }

    /// Settled cell at `(row, col)`, `None` outside the board
    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.rows || col >= self.columns {
            return None;
        }
        self.board.get(row * self.columns + col).copied()
    }

    pub fn playable(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}
