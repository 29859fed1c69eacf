//! # Embeddings
//!
//! This crate turns message text into dense vectors through an external
//! embedding provider.
//!
//! ## Features
//!
//! - **Provider seam**: [`EmbeddingProvider`] abstracts one upstream call
//! - **Chunked batching**: [`EmbeddingClient`] amortizes provider round-trips
//! - **Atomic batch contract**: a failed chunk fails the whole batch
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                 Embeddings System                    │
//! ├──────────────────────────────────────────────────────┤
//! │  EmbeddingClient ──► EmbeddingProvider ──► OpenAI    │
//! │   (chunking,          (one HTTP call                 │
//! │    order-stitching)    per chunk)                    │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod error;
pub mod provider;

pub use client::EmbeddingClient;
pub use error::{EmbeddingError, Result};
pub use provider::{EmbeddingProvider, OpenAiProvider};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of embeddings (varies by model).
pub const DEFAULT_DIMENSION: usize = 1536; // OpenAI text-embedding-3-small
