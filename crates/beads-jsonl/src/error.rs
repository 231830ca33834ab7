//! Error types for JSONL operations.

use std::io;
use thiserror::Error;

/// The error type for fatal JSONL failures.
///
/// Per-line parse problems are not errors; they surface as
/// [`crate::Warning`]s from the resilient reader. An `Error` means the
/// operation as a whole could not complete.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying file or stream I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Serialization of a record failed during a write.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for JSONL operations.
pub type Result<T> = std::result::Result<T, Error>;
