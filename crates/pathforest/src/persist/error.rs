//! Errors raised while reading persisted inputs.

use std::io;

/// Error type for loading a model or category map.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The content is not valid JSON for the expected schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The content parsed but describes an inconsistent model.
    #[error("validation error: {0}")]
    Validation(String),
}
