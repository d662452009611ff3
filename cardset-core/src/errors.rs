use thiserror::Error;

use crate::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("review error: {0}")]
    Cursor(#[from] CursorError),
}

/// Failure of a single read or write against a storage slot.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("quota exceeded: writing {needed} bytes would exceed the {limit} byte limit")]
    QuotaExceeded { needed: usize, limit: usize },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Why a persisted collection could not be restored.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read slot: {0}")]
    Read(#[from] StorageError),
    #[error("could not parse slot: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid collection: {0}")]
    Invalid(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("cannot review a group without terms")]
    Empty,
    #[error("term index {index} is out of range (group has {len} terms)")]
    OutOfRange { index: usize, len: usize },
}
