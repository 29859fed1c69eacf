//! Storage seam for messages.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::message::{Message, PendingMessage};

/// Trait for message storage backends.
///
/// All operations are keyed by row id. `update_embedding` is a targeted
/// single-row write; no batch update primitive is assumed, which is what
/// lets the backfill pipeline isolate per-row failures.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert a new message row.
    async fn insert(&self, message: Message) -> Result<()>;

    /// Fetch a message by id.
    async fn get(&self, id: Uuid) -> Result<Option<Message>>;

    /// Select rows with no embedding, oldest first, capped at `limit`.
    async fn select_pending_embeddings(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<PendingMessage>>;

    /// Count rows with no embedding.
    async fn count_pending(&self) -> Result<usize>;

    /// Count all rows.
    async fn count_total(&self) -> Result<usize>;

    /// Set the embedding for a single row.
    ///
    /// Either the full vector is persisted or the row is left unchanged.
    /// Embeddings are write-once; updating an already-embedded row fails.
    async fn update_embedding(&self, id: Uuid, embedding: &[f32]) -> Result<()>;
}
