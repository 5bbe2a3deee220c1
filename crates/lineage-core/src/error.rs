//! Error types for Lineage.

use std::io;
use thiserror::Error;

/// Errors raised at the boundaries: reading files, decoding rows, loading config.
///
/// Graph queries never produce these; a missing person is just `None`.
#[derive(Error, Debug)]
pub enum LineageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown person: {0}")]
    UnknownPerson(String),
}

/// Result type alias for Lineage operations.
pub type Result<T> = std::result::Result<T, LineageError>;
