//! Error taxonomy for the core.
//!
//! Illegal moves and game over are not errors; they are ordinary outcomes reported as
//! `bool` and [`GamePhase`](crate::types::GamePhase) respectively.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    /// A coordinate outside `[0, rows) × [0, columns)` reached the grid.
    #[error("position (row {row}, col {col}) is outside the grid")]
    OutOfBounds { row: i64, col: i64 },

    /// A shape factory was handed a value that names no shape kind.
    #[error("unknown shape kind {0}")]
    InvalidShapeKind(i64),

    /// A loaded save does not describe a state this session can hold.
    #[error("corrupt save: {0}")]
    CorruptSave(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("save i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("save encoding failed: {0}")]
    Encoding(String),
}

impl GameError {
    /// Short machine-readable code, stable across message changes.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::OutOfBounds { .. } => "out_of_bounds",
            GameError::InvalidShapeKind(_) => "invalid_shape_kind",
            GameError::CorruptSave(_) => "corrupt_save",
            GameError::InvalidConfig(_) => "invalid_config",
            GameError::Io(_) => "io",
            GameError::Encoding(_) => "encoding",
        }
    }

    pub(crate) fn corrupt(message: impl Into<String>) -> Self {
        GameError::CorruptSave(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = GameError::OutOfBounds { row: -1, col: 3 };
        assert_eq!(err.to_string(), "position (row -1, col 3) is outside the grid");
        assert_eq!(err.code(), "out_of_bounds");

        let err = GameError::InvalidShapeKind(9);
        assert_eq!(err.to_string(), "unknown shape kind 9");
    }

    #[test]
    fn test_io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err: GameError = io.into();
        assert_eq!(err.code(), "io");
    }
}
