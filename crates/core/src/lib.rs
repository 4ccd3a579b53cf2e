//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the rules and the simulation: the board, pieces, legality checks,
//! line clears, scoring, the shape queue and the clock scheduler, tied together by
//! [`GameSession`]. It performs no I/O; rendering, persistence and feedback are reached
//! through the traits in [`collab`].
//!
//! - **Deterministic**: a fixed seed replays the same shape sequence
//! - **Headless**: [`NullRenderer`] and [`MemoryStore`] run a full game without a screen
//! - **Host-driven**: the host calls [`GameSession::tick`] once per frame with elapsed time
//!
//! # Module Structure
//!
//! - [`grid`]: settled cells, bounds and row compaction
//! - [`piece`]: shape layouts and the axis-swap rotation rule
//! - [`movement`]: move/rotate/placement legality and the ghost position
//! - [`line_clear`]: full-row detection and clearing
//! - [`scoring`]: points, level and gravity step functions, high score
//! - [`spawn`]: active shape plus two tips, weighted generation with a repeat guard
//! - [`scheduler`]: cooperative periodic clocks
//! - [`session`]: the state machine
//! - [`save`]: persisted layout and validation
//!
//! # Game Rules
//!
//! - Rows count from the bottom; pieces are born at `(rows - 2, columns / 2)`
//! - No wall kicks: a rotation either fits where it is or does not happen
//! - A piece locks the moment a Down move fails (no lock delay)
//! - Locking with any cell above the death line, or spawning into settled cells, ends the game
//! - Clears score `{1: 10, 2: 30, 3: 60, 4: 100} + level × rows`
//!
//! # Example
//!
//! ```
//! use blockfall_core::{GameConfig, GameSession, MemoryStore, NoFeedback, NullRenderer};
//! use blockfall_types::{GamePhase, InputEvent};
//!
//! let config = GameConfig::default().with_seed(12345);
//! let mut game = GameSession::new(config, NullRenderer, MemoryStore::new(), NoFeedback).unwrap();
//! game.boot().unwrap();
//! game.handle_input(InputEvent::Start).unwrap();
//! assert_eq!(game.phase(), GamePhase::Playing);
//!
//! game.handle_input(InputEvent::MoveLeft).unwrap();
//! game.handle_input(InputEvent::CancelMoveLeft).unwrap();
//! game.tick(16).unwrap();
//! assert!(game.active().is_some());
//! ```

pub mod collab;
pub mod config;
pub mod error;
pub mod grid;
pub mod line_clear;
pub mod movement;
mod overlay;
pub mod piece;
pub mod save;
pub mod scheduler;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod spawn;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use collab::{Feedback, MemoryStore, NoFeedback, NoPersistence, NullRenderer, Persistence, Renderer};
pub use config::{GameConfig, RepeatGuard, ShapeDistribution};
pub use error::GameError;
pub use grid::Grid;
pub use piece::Piece;
pub use save::{SaveState, ShapeRecord};
pub use scheduler::{ClockControl, ClockId, FireCount, Scheduler};
pub use scoring::{HighScore, PlayerProgress};
pub use session::{BootOutcome, GameSession, SessionAction};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use spawn::{ShapeInfo, SpawnQueue};
