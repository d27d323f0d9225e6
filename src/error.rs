//! Error types for the reader core.

use thiserror::Error;

/// Result type alias using the engine's error type.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised by playback engine operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A rate that is zero, negative, NaN or infinite was requested.
    #[error("invalid reading rate: {requested} wpm")]
    InvalidRate { requested: f64 },
}

/// Errors raised while loading or saving the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config format error: {0}")]
    Json(#[from] serde_json::Error),
}
