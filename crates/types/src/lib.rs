//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be used by the
//! simulation core, the input mapper, the save store and any host.
//!
//! # Board Geometry
//!
//! Rows are counted from the bottom: row 0 is the floor and gravity *decreases* the row
//! index. The default board is 10 columns wide with 20 playable rows plus 4 spawn rows
//! above them:
//!
//! - **Columns**: 10 (indexed 0-9)
//! - **Play rows**: 20 (indexed 0-19, row 19 is the death line)
//! - **Spawn rows**: 4 (indexed 20-23)
//! - **Birth position**: row `rows - 2`, column `columns / 2`
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `SOFT_DROP_INTERVAL_MS` | 40 | Gravity while the down input is held |
//! | `MOVE_REPEAT_INTERVAL_MS` | 150 | Auto-repeat for held left/right |
//! | `FRAME_MS` | 16 | Host frame length (~60 FPS) |
//!
//! # Gravity by Level
//!
//! | Level | Interval |
//! |-------|----------|
//! | 0-10 | 690ms |
//! | 11-20 | 500ms |
//! | 21-30 | 360ms |
//! | 31-40 | 260ms |
//! | 41-50 | 190ms |
//! | 51-60 | 140ms |
//! | 61+ | 100ms |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{InputEvent, RotationState, ShapeKind, BOARD_COLUMNS};
//!
//! let kind = ShapeKind::from_str("t").unwrap();
//! assert_eq!(kind, ShapeKind::T);
//! assert_eq!(ShapeKind::from_index(3), Some(ShapeKind::O));
//!
//! assert_eq!(RotationState::Up.next(), RotationState::Right);
//!
//! assert_eq!(InputEvent::from_str("moveLeft"), Some(InputEvent::MoveLeft));
//! assert_eq!(BOARD_COLUMNS, 10);
//! ```

/// Board width in cells
pub const BOARD_COLUMNS: u16 = 10;

/// Playable rows; the highest of them is the death line
pub const PLAY_ROWS: u16 = 20;

/// Rows above the death line where new pieces are born
pub const SPAWN_ROWS: u16 = 4;

/// Number of piece colours in the default palette
pub const PALETTE_SIZE: u8 = 7;

/// Host frame length in milliseconds (16ms ≈ 60 FPS)
pub const FRAME_MS: u32 = 16;

/// Gravity interval while the down input is held
pub const SOFT_DROP_INTERVAL_MS: u32 = 40;

/// Auto-repeat interval for held left/right input
pub const MOVE_REPEAT_INTERVAL_MS: u32 = 150;

/// Gravity steps: `(highest level, interval ms)`, checked in order.
pub const GRAVITY_STEPS: [(u32, u32); 6] = [
    (10, 690),
    (20, 500),
    (30, 360),
    (40, 260),
    (50, 190),
    (60, 140),
];

/// Gravity interval past the last step
pub const GRAVITY_FLOOR_MS: u32 = 100;

/// Score steps: `(highest score, level base, score base, points per level)`.
pub const LEVEL_STEPS: [(u32, u32, u32, u32); 5] = [
    (1000, 0, 0, 100),
    (2500, 10, 1000, 150),
    (4500, 20, 2500, 200),
    (7000, 30, 4500, 250),
    (10000, 40, 7000, 300),
];

/// Level step used for every score past the last breakpoint
pub const LEVEL_TAIL: (u32, u32, u32) = (50, 10000, 350);

/// Base points for clearing N rows in one lock (index = rows cleared)
///
/// - 1 row: 10
/// - 2 rows: 30
/// - 3 rows: 60
/// - 4 rows: 100
///
/// Any other count falls back to the single-row value. A level bonus of
/// `level × rows` is added on top.
pub const LINE_CLEAR_SCORES: [u32; 5] = [0, 10, 30, 60, 100];

/// Default spawn weights in `ShapeKind::ALL` order (I, J, L, O, S, T, Z), summing to 100.
pub const DEFAULT_SHAPE_WEIGHTS: [u32; 7] = [20, 10, 10, 16, 14, 16, 14];


/// The seven piece kinds, in save-file order
///
/// The discriminant order is part of the save format: I=0, J=1, L=2, O=3, S=4, T=5, Z=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl ShapeKind {
    /// Every kind in declaration order
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::J,
        ShapeKind::L,
        ShapeKind::O,
        ShapeKind::S,
        ShapeKind::T,
        ShapeKind::Z,
    ];

    /// Index in declaration order (the save-file encoding)
    pub fn index(self) -> usize {
        match self {
            ShapeKind::I => 0,
            ShapeKind::J => 1,
            ShapeKind::L => 2,
            ShapeKind::O => 3,
            ShapeKind::S => 4,
            ShapeKind::T => 5,
            ShapeKind::Z => 6,
        }
    }

    /// Decode a save-file index
    ///
    /// ```
    /// use blockfall_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_index(0), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_index(6), Some(ShapeKind::Z));
    /// assert_eq!(ShapeKind::from_index(7), None);
    /// assert_eq!(ShapeKind::from_index(-1), None);
    /// ```
    pub fn from_index(value: i64) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Parse kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("i"), Some(ShapeKind::I));
    /// assert_eq!(ShapeKind::from_str("O"), Some(ShapeKind::O));
    /// assert_eq!(ShapeKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(ShapeKind::I),
            "j" => Some(ShapeKind::J),
            "l" => Some(ShapeKind::L),
            "o" => Some(ShapeKind::O),
            "s" => Some(ShapeKind::S),
            "t" => Some(ShapeKind::T),
            "z" => Some(ShapeKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::I => "i",
            ShapeKind::J => "j",
            ShapeKind::L => "l",
            ShapeKind::O => "o",
            ShapeKind::S => "s",
            ShapeKind::T => "t",
            ShapeKind::Z => "z",
        }
    }

    /// Cells of the kind inside a 2x4 tip preview, `(row, col)` with row 0 at the bottom.
    pub fn preview_cells(self) -> [(u8, u8); 4] {
        match self {
            ShapeKind::I => [(0, 0), (0, 1), (0, 2), (0, 3)],
            ShapeKind::J => [(1, 0), (0, 0), (0, 1), (0, 2)],
            ShapeKind::L => [(0, 0), (0, 1), (0, 2), (1, 2)],
            ShapeKind::O => [(1, 0), (1, 1), (0, 0), (0, 1)],
            ShapeKind::S => [(0, 0), (0, 1), (1, 1), (1, 2)],
            ShapeKind::T => [(0, 0), (0, 1), (1, 1), (0, 2)],
            ShapeKind::Z => [(1, 0), (1, 1), (0, 1), (0, 2)],
        }
    }
}

/// Rotation state of a piece
///
/// Rotation always advances Up → Right → Down → Left → Up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RotationState {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl RotationState {
    /// The state a single rotation moves to
    pub fn next(self) -> Self {
        match self {
            RotationState::Up => RotationState::Right,
            RotationState::Right => RotationState::Down,
            RotationState::Down => RotationState::Left,
            RotationState::Left => RotationState::Up,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RotationState::Up => "up",
            RotationState::Right => "right",
            RotationState::Down => "down",
            RotationState::Left => "left",
        }
    }
}

/// Direction of a one-cell translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// `(row delta, column delta)`; rows grow upwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (1, 0),
            Direction::Down => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Absolute board position. Signed so candidate positions may fall outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        self.offset(d_row, d_col)
    }
}

/// Opaque palette index of a piece colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorId(pub u8);

/// A cell on the game board
///
/// - `Empty`: background
/// - `Filled(ColorId)`: a settled block of the given colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Filled(ColorId),
}

impl Cell {
    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Filled(_))
    }

    pub fn color(&self) -> Option<ColorId> {
        match self {
            Cell::Empty => None,
            Cell::Filled(color) => Some(*color),
        }
    }

    /// Save-file encoding: palette index, or -1 for background
    pub fn to_save_index(&self) -> i32 {
        match self {
            Cell::Empty => -1,
            Cell::Filled(ColorId(c)) => i32::from(*c),
        }
    }
}

/// What a renderer should paint at one board position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellColor {
    Background,
    /// Settled block or the falling piece
    Block(ColorId),
    /// Predicted landing position of the falling piece
    Ghost(ColorId),
}

impl From<Cell> for CellColor {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => CellColor::Background,
            Cell::Filled(color) => CellColor::Block(color),
        }
    }
}

/// Which look-ahead slot a tip belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TipSlot {
    One,
    Two,
}

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    /// Before the first `start_game`
    #[default]
    Start,
    Playing,
    Paused,
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Start => "start",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "gameOver",
        }
    }
}

/// Edge-triggered input events and session commands
///
/// Movement events come in press/release pairs; the session turns a held direction
/// into scheduler-driven repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    /// Rotate the active piece once
    Rotate,
    /// Move left once and start auto-repeat
    MoveLeft,
    /// Stop left auto-repeat
    CancelMoveLeft,
    /// Move right once and start auto-repeat
    MoveRight,
    /// Stop right auto-repeat
    CancelMoveRight,
    /// Move down once and switch gravity to soft-drop speed
    MoveDown,
    /// Restore level gravity
    CancelMoveDown,
    /// Leave the start screen (or restart after game over)
    Start,
    /// Pause or resume
    TogglePause,
    /// Reset board and progress
    Restart,
}

impl InputEvent {
    /// Parse an event name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::InputEvent;
    ///
    /// assert_eq!(InputEvent::from_str("rotate"), Some(InputEvent::Rotate));
    /// assert_eq!(InputEvent::from_str("cancelMoveDown"), Some(InputEvent::CancelMoveDown));
    /// assert_eq!(InputEvent::from_str("hardDrop"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rotate" => Some(InputEvent::Rotate),
            "moveleft" => Some(InputEvent::MoveLeft),
            "cancelmoveleft" => Some(InputEvent::CancelMoveLeft),
            "moveright" => Some(InputEvent::MoveRight),
            "cancelmoveright" => Some(InputEvent::CancelMoveRight),
            "movedown" => Some(InputEvent::MoveDown),
            "cancelmovedown" => Some(InputEvent::CancelMoveDown),
            "start" => Some(InputEvent::Start),
            "togglepause" => Some(InputEvent::TogglePause),
            "restart" => Some(InputEvent::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase name
    pub fn as_str(&self) -> &'static str {
        match self {
            InputEvent::Rotate => "rotate",
            InputEvent::MoveLeft => "moveLeft",
            InputEvent::CancelMoveLeft => "cancelMoveLeft",
            InputEvent::MoveRight => "moveRight",
            InputEvent::CancelMoveRight => "cancelMoveRight",
            InputEvent::MoveDown => "moveDown",
            InputEvent::CancelMoveDown => "cancelMoveDown",
            InputEvent::Start => "start",
            InputEvent::TogglePause => "togglePause",
            InputEvent::Restart => "restart",
        }
    }

    /// Whether the event moves the falling piece.
    ///
    /// Releases are not movement: they only stop repeats, so they apply in any phase.
    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            InputEvent::Rotate | InputEvent::MoveLeft | InputEvent::MoveRight | InputEvent::MoveDown
        )
    }
}

/// Core-side event emitted after a piece locks.
///
/// Observers take it with `GameSession::take_last_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub kind: ShapeKind,
    pub rows_cleared: u32,
    pub points: u32,
    pub score: u32,
    pub level: u32,
    pub game_over: bool,
}
