//! Error types for editor session operations.

use livepen_traits::{ArchiveError, StorageError};
use livepen_types::DocumentRole;
use thiserror::Error;

/// The error enum for every fallible [`EditorSession`](crate::EditorSession)
/// operation.
///
/// None of these are fatal; the host reports them and carries on.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Unknown file '{0}'")]
    UnknownFile(String),

    #[error("{role} is too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge {
        role: DocumentRole,
        size: usize,
        limit: usize,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Export failed: {0}")]
    Archive(#[from] ArchiveError),
}
