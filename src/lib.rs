//! Blockfall (workspace facade crate).
//!
//! Re-exports the member crates under `blockfall::{core,input,store,types}` and carries the
//! pieces only the terminal binary needs: environment configuration ([`host`]) and the
//! crossterm renderer ([`terminal`]).

pub mod host;
pub mod terminal;

pub use blockfall_core as core;
pub use blockfall_input as input;
pub use blockfall_store as store;
pub use blockfall_types as types;
