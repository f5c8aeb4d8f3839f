//! Error types and handling
//!
//! Errors only surface at the seams where the host environment can fail.
//! The decision path itself never returns one.

use thiserror::Error;

/// Crate-wide error type
#[derive(Error, Debug)]
pub enum QualityError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Unknown quality tier: {0}")]
    UnknownTier(String),

    #[error("Listener registration failed: {0}")]
    ListenerRegistration(String),

    #[error("Byte counter unavailable: {0}")]
    CounterUnavailable(String),
}

/// Result type alias using QualityError
pub type QualityResult<T> = Result<T, QualityError>;
