//! Collaborator seams: rendering, persistence and feedback.
//!
//! The session calls out through these traits and never does I/O itself. Each has a
//! do-nothing (or in-memory) implementation so the core runs headless.

use crate::error::GameError;
use crate::save::SaveState;
use crate::scoring::PlayerProgress;
use crate::spawn::ShapeInfo;
use crate::types::{CellColor, GamePhase, TipSlot};

/// Receives board cell changes and optional HUD updates.
pub trait Renderer {
    /// Paint one board cell. Called only for cells whose colour changed.
    fn set_cell_color(&mut self, row: usize, col: usize, color: CellColor);

    fn show_tip(&mut self, _slot: TipSlot, _shape: &ShapeInfo) {}

    fn show_progress(&mut self, _progress: &PlayerProgress) {}

    fn show_phase(&mut self, _phase: GamePhase) {}
}

/// Stores and loads the single save slot.
pub trait Persistence {
    fn save(&mut self, state: &SaveState) -> Result<(), GameError>;

    /// `Ok(None)` when nothing has been saved yet.
    fn load(&mut self) -> Result<Option<SaveState>, GameError>;
}

/// Fire-and-forget hooks for haptics or audio.
pub trait Feedback {
    fn on_line_clear_success(&mut self) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn set_cell_color(&mut self, _row: usize, _col: usize, _color: CellColor) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoFeedback;

impl Feedback for NoFeedback {}

/// Keeps the save in memory; counts writes.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    slot: Option<SaveState>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `state`
    pub fn with_state(state: SaveState) -> Self {
        Self {
            slot: Some(state),
            saves: 0,
        }
    }

    pub fn state(&self) -> Option<&SaveState> {
        self.slot.as_ref()
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl Persistence for MemoryStore {
    fn save(&mut self, state: &SaveState) -> Result<(), GameError> {
        self.slot = Some(state.clone());
        self.saves += 1;
        Ok(())
    }

    fn load(&mut self) -> Result<Option<SaveState>, GameError> {
        Ok(self.slot.clone())
    }
}

/// Persistence that drops every save; for hosts running without a save slot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPersistence;

impl Persistence for NoPersistence {
    fn save(&mut self, _state: &SaveState) -> Result<(), GameError> {
        Ok(())
    }

    fn load(&mut self) -> Result<Option<SaveState>, GameError> {
        Ok(None)
    }
}

impl<T: Persistence + ?Sized> Persistence for Box<T> {
    fn save(&mut self, state: &SaveState) -> Result<(), GameError> {
        (**self).save(state)
    }

    fn load(&mut self) -> Result<Option<SaveState>, GameError> {
        (**self).load()
    }
}
