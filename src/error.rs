//! Engine error types
//!
//! Only construction and configuration can fail. Gameplay itself never
//! returns errors: invalid state transitions are ignored, and persistence
//! failures are logged by the caller.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The host could not provide a 2D drawing context
    #[error("2D drawing context is unavailable")]
    NoDrawingContext,
    /// Settings JSON could not be parsed or serialized
    #[error("invalid settings: {0}")]
    Settings(#[from] serde_json::Error),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// High score storage backend failure
    #[error("storage error: {0}")]
    Storage(String),
    /// A level definition was rejected
    #[error("invalid level '{name}': {reason}")]
    InvalidLevel { name: String, reason: String },
    /// A level set needs at least one level
    #[error("level set is empty")]
    EmptyLevelSet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_level_message() {
        let err = EngineError::InvalidLevel {
            name: "Zigzag".to_string(),
            reason: "no bricks".to_string(),
        };
        assert_eq!(err.to_string(), "invalid level 'Zigzag': no bricks");
    }

    #[test]
    fn test_settings_error_from_json() {
        let json_err = serde_json::from_str::<u64>("not a number").unwrap_err();
        let err: EngineError = json_err.into();
        assert!(matches!(err, EngineError::Settings(_)));
    }
}
