//! Bulk embedding backfill.
//!
//! The coordinator finds rows that still lack an embedding, embeds their
//! content in one logically-atomic batch, then persists the vectors one row
//! at a time so that a storage failure on one row never blocks the rest.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use chatvec_embeddings::EmbeddingClient;
use chatvec_store::{MessageStore, PendingMessage};

use crate::error::{BackfillError, Result};

/// Default number of texts per provider call.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Options for a backfill invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackfillOptions {
    /// Maximum texts per provider call.
    pub batch_size: usize,

    /// Cap on the number of candidate rows considered.
    pub limit: Option<usize>,
}

impl Default for BackfillOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            limit: None,
        }
    }
}

impl BackfillOptions {
    /// Set the per-call batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Cap the number of candidate rows considered.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A row whose storage update failed during the persistence phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowError {
    /// Row id.
    pub id: Uuid,

    /// Failure message.
    pub message: String,
}

/// Aggregate result of one backfill invocation.
///
/// Ephemeral; created fresh per invocation and discarded after the caller
/// reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackfillReport {
    /// Rows successfully embedded and saved.
    pub processed: usize,

    /// Eligible rows that entered the embedding phase.
    pub total_considered: usize,

    /// Selected rows skipped for empty or whitespace-only content. These
    /// are permanently excluded from embedding, never errors.
    pub skipped_empty: usize,

    /// Rows whose storage update failed. Embedding succeeded for all of
    /// them; a rerun will re-select them.
    pub errors: Vec<RowError>,
}

impl BackfillReport {
    /// Whether every eligible row was persisted.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty() && self.processed == self.total_considered
    }
}

/// Read-only snapshot of embedding coverage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackfillStats {
    /// Rows with no embedding.
    pub without_embeddings: usize,

    /// All rows.
    pub total: usize,

    /// Rows with an embedding.
    pub with_embeddings: usize,
}

/// Drives the retroactive embedding backfill.
pub struct BackfillCoordinator {
    client: EmbeddingClient,
    store: Arc<dyn MessageStore>,
}

impl BackfillCoordinator {
    /// Create a new coordinator.
    pub fn new(client: EmbeddingClient, store: Arc<dyn MessageStore>) -> Self {
        Self { client, store }
    }

    /// Run one backfill invocation.
    ///
    /// Selection and embedding failures abort the whole invocation with no
    /// row written; the next invocation re-selects the same still-pending
    /// rows, so retry at this granularity is idempotent. Per-row storage
    /// failures during persistence are isolated and reported instead.
    pub async fn run(&self, options: &BackfillOptions) -> Result<BackfillReport> {
        // Step 1: selection. A store failure here aborts before any work.
        let selected = self.store.select_pending_embeddings(options.limit).await?;
        debug!("Selected {} pending rows", selected.len());

        // Step 2: drop rows with nothing to embed.
        let (eligible, skipped_empty) = partition_eligible(selected);

        // Step 3: nothing to do is success, not an error.
        if eligible.is_empty() {
            info!("Backfill found no eligible rows ({skipped_empty} skipped for empty content)");
            return Ok(BackfillReport {
                skipped_empty,
                ..BackfillReport::default()
            });
        }

        let total_considered = eligible.len();
        info!(
            "Backfilling {total_considered} rows (batch size {})",
            options.batch_size
        );

        // Step 4: one logical batch, internally chunked. Any chunk failure
        // aborts the invocation before a single row is updated; there is no
        // per-item fallback.
        let texts: Vec<String> = eligible.iter().map(|row| row.content.clone()).collect();
        let embeddings = self.client.embed_batch(&texts, options.batch_size).await?;

        if embeddings.len() != eligible.len() {
            return Err(BackfillError::VectorCountMismatch {
                messages: eligible.len(),
                embeddings: embeddings.len(),
            });
        }

        // Step 5: persist row-by-row; failures are isolated per row.
        let mut processed = 0;
        let mut errors = Vec::new();

        for (row, embedding) in eligible.iter().zip(embeddings.iter()) {
            match self.store.update_embedding(row.id, embedding).await {
                Ok(()) => processed += 1,
                Err(e) => {
                    warn!("Failed to store embedding for message {}: {e}", row.id);
                    errors.push(RowError {
                        id: row.id,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Backfill complete: {processed} processed, {} errors, {total_considered} considered",
            errors.len()
        );

        Ok(BackfillReport {
            processed,
            total_considered,
            skipped_empty,
            errors,
        })
    }

    /// Snapshot how many rows still lack an embedding.
    pub async fn stats(&self) -> Result<BackfillStats> {
        let without_embeddings = self.store.count_pending().await?;
        let total = self.store.count_total().await?;

        Ok(BackfillStats {
            without_embeddings,
            total,
            with_embeddings: total.saturating_sub(without_embeddings),
        })
    }
}

/// Split selected rows into embeddable rows and an empty-content count.
fn partition_eligible(selected: Vec<PendingMessage>) -> (Vec<PendingMessage>, usize) {
    let total = selected.len();
    let eligible: Vec<PendingMessage> = selected
        .into_iter()
        .filter(|row| !row.content.trim().is_empty())
        .collect();
    let skipped = total - eligible.len();
    (eligible, skipped)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn pending(content: &str) -> PendingMessage {
        PendingMessage {
            id: Uuid::new_v4(),
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_partition_eligible() {
        let rows = vec![pending("hello"), pending("   "), pending(""), pending("hi")];
        let (eligible, skipped) = partition_eligible(rows);

        assert_eq!(eligible.len(), 2);
        assert_eq!(skipped, 2);
        assert_eq!(eligible[0].content, "hello");
        assert_eq!(eligible[1].content, "hi");
    }

    #[test]
    fn test_options_defaults() {
        let options = BackfillOptions::default();
        assert_eq!(options.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(options.limit, None);
    }

    #[test]
    fn test_report_completeness() {
        let complete = BackfillReport {
            processed: 3,
            total_considered: 3,
            ..BackfillReport::default()
        };
        assert!(complete.is_complete());

        let partial = BackfillReport {
            processed: 2,
            total_considered: 3,
            errors: vec![RowError {
                id: Uuid::new_v4(),
                message: "write failed".to_string(),
            }],
            ..BackfillReport::default()
        };
        assert!(!partial.is_complete());
    }
}
