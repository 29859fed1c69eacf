//! Error types for message storage.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in a message store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No message with the given id.
    #[error("message not found: {0}")]
    NotFound(Uuid),

    /// A message with the given id already exists.
    #[error("message already exists: {0}")]
    DuplicateId(Uuid),

    /// The row already carries an embedding; embeddings are write-once.
    #[error("message already embedded: {0}")]
    AlreadyEmbedded(Uuid),

    /// Backend failure (connection loss, constraint violation, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
}
