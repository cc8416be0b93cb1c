//! Storage error types for goalgraph-storage.
//!
//! [`StorageError`] covers the failure modes of the JSON codec: filesystem
//! errors, malformed documents, and graph-level errors raised while the
//! document is rebuilt into a [`GoalGraph`](goalgraph_core::GoalGraph).

use goalgraph_core::CoreError;
use thiserror::Error;

/// Errors produced by save and load operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the document file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The document described an invalid graph (unknown edge type or
    /// dangling edge endpoint).
    #[error(transparent)]
    Core(#[from] CoreError),
}
