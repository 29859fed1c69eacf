//! Inline embedding at message creation.

use std::sync::Arc;

use tracing::{debug, warn};

use chatvec_embeddings::EmbeddingClient;
use chatvec_store::{Message, MessageStore, NewMessage};

use crate::error::IngestError;

/// Creates messages and attaches an embedding when it can.
///
/// Embedding here is an enrichment, not a correctness requirement: a
/// provider failure is logged and the message is still created with the
/// embedding left absent, making it a backfill candidate. Exactly one
/// provider call is made per message; there is no retry or queuing.
pub struct MessageIngestor {
    client: EmbeddingClient,
    store: Arc<dyn MessageStore>,
}

impl MessageIngestor {
    /// Create a new ingestor.
    pub fn new(client: EmbeddingClient, store: Arc<dyn MessageStore>) -> Self {
        Self { client, store }
    }

    /// Create a message, attaching an embedding on a best-effort basis.
    pub async fn create_message(&self, new: NewMessage) -> Result<Message, IngestError> {
        if new.content.trim().is_empty() {
            return Err(IngestError::EmptyContent);
        }

        let embedding = match self.client.embed_one(&new.content).await {
            Ok(vector) => {
                debug!("Generated inline embedding ({} dims)", vector.len());
                Some(vector)
            }
            Err(e) => {
                // Degrade gracefully; the backfill picks this row up later.
                warn!("Failed to generate embedding for new message: {e}");
                None
            }
        };

        let message = new.into_message(embedding);
        self.store.insert(message.clone()).await?;

        Ok(message)
    }
}
