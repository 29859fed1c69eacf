//! # Backfill
//!
//! Embedding ingestion and backfill pipeline for chat messages.
//!
//! Two independent entry points share the embedding client and the message
//! store but never call each other:
//!
//! - [`MessageIngestor`] attaches an embedding at creation time on a
//!   best-effort basis; provider failures never block message creation.
//! - [`BackfillCoordinator`] retroactively embeds rows that were created
//!   before embeddings existed or whose inline attempt failed.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                  Embedding Pipeline                        │
//! ├────────────────────────────────────────────────────────────┤
//! │  MessageIngestor ───┐            ┌─── BackfillCoordinator  │
//! │   (best-effort,     │            │     (batch, resumable)  │
//! │    non-blocking)    ▼            ▼                         │
//! │              EmbeddingClient   MessageStore                │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod coordinator;
pub mod error;
pub mod ingest;

pub use coordinator::{
    BackfillCoordinator, BackfillOptions, BackfillReport, BackfillStats, DEFAULT_BATCH_SIZE,
    RowError,
};
pub use error::{BackfillError, IngestError, Result};
pub use ingest::MessageIngestor;

// Re-export from dependencies for convenience
pub use chatvec_embeddings::{EmbeddingClient, EmbeddingProvider};
pub use chatvec_store::{MemoryStore, Message, MessageStore, NewMessage};
