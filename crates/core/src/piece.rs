//! Piece module - shape layouts and the axis-swap rotation rule
//!
//! Every piece is four cells; cell 0 is the anchor. Rotation maps each cell's offset from
//! the anchor through a small transform chosen by the *target* rotation state:
//!
//! - with `swap`: `(row, col) -> (sign.0 * col, sign.1 * row)`
//! - without: `(row, col) -> (sign.0 * row, sign.1 * col)`
//!
//! The default rule `swap, (-1, +1)` is a clockwise quarter turn. I, S and Z register
//! `swap, (+1, -1)` for Up and Down, so they flip between two orientations instead of
//! walking through four. O never rotates.

use crate::error::GameError;
use crate::types::{ColorId, Position, RotationState, ShapeKind};

/// Cell offsets `(row, col)` from the anchor; anchor first
pub type ShapeLayout = [(i32, i32); 4];

/// Transform applied to cell offsets when entering a rotation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationRule {
    pub swap: bool,
    pub sign: (i32, i32),
}

impl RotationRule {
    pub const CLOCKWISE: RotationRule = RotationRule {
        swap: true,
        sign: (-1, 1),
    };

    pub const COUNTER_CLOCKWISE: RotationRule = RotationRule {
        swap: true,
        sign: (1, -1),
    };

    #[inline]
    pub fn apply(self, d_row: i32, d_col: i32) -> (i32, i32) {
        if self.swap {
            (self.sign.0 * d_col, self.sign.1 * d_row)
        } else {
            (self.sign.0 * d_row, self.sign.1 * d_col)
        }
    }
}

/// Spawn layout of a kind, in rotation state Up
pub fn layout(kind: ShapeKind) -> ShapeLayout {
    match kind {
        ShapeKind::I => [(0, 0), (0, -1), (0, 1), (0, 2)],
        ShapeKind::J => [(0, 0), (1, 0), (-1, 0), (-1, -1)],
        ShapeKind::L => [(0, 0), (1, 1), (0, -1), (0, 1)],
        ShapeKind::O => [(0, 0), (0, 1), (1, 0), (1, 1)],
        ShapeKind::S => [(0, 0), (1, -1), (0, -1), (-1, 0)],
        ShapeKind::Z => [(0, 0), (1, -1), (1, 0), (0, 1)],
        ShapeKind::T => [(0, 0), (0, -1), (0, 1), (1, 0)],
    }
}

/// Rule used when rotating *into* `target`; `None` means the kind does not rotate.
pub fn rotation_rule(kind: ShapeKind, target: RotationState) -> Option<RotationRule> {
    match kind {
        ShapeKind::O => None,
        ShapeKind::I | ShapeKind::S | ShapeKind::Z => match target {
            RotationState::Up | RotationState::Down => Some(RotationRule::COUNTER_CLOCKWISE),
            RotationState::Right | RotationState::Left => Some(RotationRule::CLOCKWISE),
        },
        ShapeKind::J | ShapeKind::L | ShapeKind::T => Some(RotationRule::CLOCKWISE),
    }
}

/// Decode a kind coming from outside the type system (save files, scripts).
pub fn kind_from_index(value: i64) -> Result<ShapeKind, GameError> {
    ShapeKind::from_index(value).ok_or(GameError::InvalidShapeKind(value))
}

/// A falling piece: kind, colour, rotation state and four absolute cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: ShapeKind,
    color: ColorId,
    rotation: RotationState,
    cells: [Position; 4],
}

impl Piece {
    /// Create a piece in state Up with its anchor at `anchor`.
    pub fn new(kind: ShapeKind, anchor: Position, color: ColorId) -> Self {
        let cells = layout(kind).map(|(d_row, d_col)| anchor.offset(d_row, d_col));
        Self {
            kind,
            color,
            rotation: RotationState::Up,
            cells,
        }
    }

    /// Shape factory for untyped kind values; unknown values are rejected.
    pub fn from_index(kind: i64, anchor: Position, color: ColorId) -> Result<Self, GameError> {
        Ok(Self::new(kind_from_index(kind)?, anchor, color))
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn color(&self) -> ColorId {
        self.color
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn anchor(&self) -> Position {
        self.cells[0]
    }

    /// The four absolute positions, anchor first
    pub fn cells(&self) -> [Position; 4] {
        self.cells
    }

    /// Shift every cell; legality is the caller's concern.
    pub fn translate(&mut self, d_row: i32, d_col: i32) {
        for cell in &mut self.cells {
            *cell = cell.offset(d_row, d_col);
        }
    }

    /// Rotate into the next state.
    ///
    /// With `commit == false` the candidate cells are returned and the piece is untouched.
    /// With `commit == true` the piece is rotated in place and `None` is returned.
    /// A kind without a rule (O) yields no candidate; committing it only advances the state.
    pub fn rotate(&mut self, commit: bool) -> Option<[Position; 4]> {
        if !commit {
            return self.rotation_candidate();
        }
        if let Some(cells) = self.rotation_candidate() {
            self.cells = cells;
        }
        self.rotation = self.rotation.next();
        None
    }

    /// Cells after one rotation, without mutating
    pub fn rotation_candidate(&self) -> Option<[Position; 4]> {
        let rule = rotation_rule(self.kind, self.rotation.next())?;
        let anchor = self.anchor();
        Some(self.cells.map(|cell| {
            let (d_row, d_col) = rule.apply(cell.row - anchor.row, cell.col - anchor.col);
            anchor.offset(d_row, d_col)
        }))
    }

    /// Lowest row any cell occupies
    pub fn bottom_row(&self) -> i32 {
        self.cells.iter().map(|c| c.row).min().unwrap_or(self.cells[0].row)
    }

    /// Highest row any cell occupies
    pub fn top_row(&self) -> i32 {
        self.cells.iter().map(|c| c.row).max().unwrap_or(self.cells[0].row)
    }
}
