//! Error types for the ingestion and backfill pipeline.

use thiserror::Error;

/// Result type alias for backfill operations.
pub type Result<T> = std::result::Result<T, BackfillError>;

/// Errors that abort a backfill invocation.
///
/// Per-row storage failures during the persistence phase are NOT errors at
/// this level; they are accumulated into the report instead.
#[derive(Error, Debug)]
pub enum BackfillError {
    /// Embedding provider failure; aborts the invocation before any row
    /// is written.
    #[error("embedding error: {0}")]
    Embedding(#[from] chatvec_embeddings::EmbeddingError),

    /// Storage failure during selection or stats.
    #[error("store error: {0}")]
    Store(#[from] chatvec_store::StoreError),

    /// The provider returned a different number of vectors than rows
    /// submitted. Fatal; no row is written.
    #[error("vector count mismatch: {messages} messages, {embeddings} embeddings")]
    VectorCountMismatch { messages: usize, embeddings: usize },
}

/// Errors that fail message creation.
///
/// Embedding failures are deliberately absent: ingestion degrades
/// gracefully and never surfaces them to the caller.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Message content is empty or whitespace-only.
    #[error("message content must not be empty")]
    EmptyContent,

    /// Storage failure while inserting the message.
    #[error("store error: {0}")]
    Store(#[from] chatvec_store::StoreError),
}
