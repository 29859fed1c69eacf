//! In-memory message store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::message::{Message, PendingMessage};
use crate::store::MessageStore;

/// In-memory storage backend for messages.
///
/// Suitable for tests and embedded deployments; everything lives in a
/// single map guarded by one lock.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<HashMap<Uuid, Message>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows currently stored.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Whether the store holds no rows.
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert(&self, message: Message) -> Result<()> {
        let mut rows = self.rows.write().await;

        if rows.contains_key(&message.id) {
            return Err(StoreError::DuplicateId(message.id));
        }

        debug!("Inserting message {}", message.id);
        rows.insert(message.id, message);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Message>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn select_pending_embeddings(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<PendingMessage>> {
        let rows = self.rows.read().await;

        let mut pending: Vec<PendingMessage> = rows
            .values()
            .filter(|row| row.embedding.is_none())
            .map(|row| PendingMessage {
                id: row.id,
                content: row.content.clone(),
                created_at: row.created_at,
            })
            .collect();

        // Oldest first so an interrupted backfill makes forward progress;
        // ties broken by id for deterministic selection.
        pending.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        if let Some(limit) = limit {
            pending.truncate(limit);
        }

        Ok(pending)
    }

    async fn count_pending(&self) -> Result<usize> {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|row| row.embedding.is_none()).count())
    }

    async fn count_total(&self) -> Result<usize> {
        Ok(self.rows.read().await.len())
    }

    async fn update_embedding(&self, id: Uuid, embedding: &[f32]) -> Result<()> {
        let mut rows = self.rows.write().await;

        let row = rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if row.embedding.is_some() {
            return Err(StoreError::AlreadyEmbedded(id));
        }

        row.embedding = Some(embedding.to_vec());
        debug!("Stored embedding for message {id}");
        Ok(())
    }
}
