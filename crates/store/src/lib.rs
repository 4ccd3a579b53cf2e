//! JSON file persistence for the game session.
//!
//! [`JsonFileStore`] keeps the single save slot in one JSON file. A missing file is an
//! empty slot; a file that does not parse is reported as a corrupt save so the session
//! can fall back to a new game.
//!
//! Writes go to a sibling temp file first and are renamed into place, so a crash mid-write
//! leaves the previous save intact.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use blockfall_core::{GameError, Persistence, SaveState};

/// Save file used when `BLOCKFALL_SAVE_PATH` is not set
pub const DEFAULT_SAVE_FILE: &str = "blockfall-save.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the save file. A missing file is not an error.
    pub fn clear(&self) -> Result<(), GameError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Persistence for JsonFileStore {
    fn save(&mut self, state: &SaveState) -> Result<(), GameError> {
        let json = serde_json::to_string_pretty(state)
            .map_err(|e| GameError::Encoding(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn load(&mut self) -> Result<Option<SaveState>, GameError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| GameError::CorruptSave(format!("{}: {e}", self.path.display())))
    }
}
