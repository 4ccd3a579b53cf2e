//! Terminal input module (session-facing).
//!
//! This crate is independent of any UI framework. It maps `crossterm` key events into
//! [`crate::types::InputEvent`] and routes presses and releases into the edge-triggered
//! pairs (`MoveLeft` / `CancelMoveLeft`, ...) the game session expects, including for
//! terminals without key-release events.

pub mod handler;
pub mod map;

pub use blockfall_types as types;

pub use handler::{HeldKey, InputRouter, Routed};
pub use map::{handle_key_event, should_quit};
