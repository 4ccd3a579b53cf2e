//! Host configuration read from the environment.

use std::env;
use std::path::PathBuf;

use crate::core::{GameConfig, NoPersistence, Persistence};
use crate::store::{JsonFileStore, DEFAULT_SAVE_FILE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub seed: Option<u64>,
    pub save_path: PathBuf,
    pub save_disabled: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            seed: None,
            save_path: PathBuf::from(DEFAULT_SAVE_FILE),
            save_disabled: false,
        }
    }
}

impl HostConfig {
    /// Read `BLOCKFALL_SEED`, `BLOCKFALL_SAVE_PATH` and `BLOCKFALL_SAVE_DISABLED`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`HostConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seed = lookup("BLOCKFALL_SEED").and_then(|s| s.trim().parse().ok());

        let save_path = lookup("BLOCKFALL_SAVE_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_FILE));

        let save_disabled = lookup("BLOCKFALL_SAVE_DISABLED")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        Self {
            seed,
            save_path,
            save_disabled,
        }
    }

    pub fn game_config(&self) -> GameConfig {
        let config = GameConfig::default();
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    pub fn open_store(&self) -> Box<dyn Persistence> {
        if self.save_disabled {
            Box::new(NoPersistence)
        } else {
            Box::new(JsonFileStore::new(self.save_path.clone()))
        }
    }
}
