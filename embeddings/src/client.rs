//! Chunked embedding client.
//!
//! `EmbeddingClient` sits between callers and an [`EmbeddingProvider`],
//! splitting large batches into provider-sized chunks and stitching the
//! results back together in input order.

use std::sync::Arc;

use tracing::{debug, info};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::provider::EmbeddingProvider;

/// Client for generating embeddings through a provider.
///
/// Batch calls are atomic: if any chunk fails, the whole call fails and the
/// caller must not assume any text in the batch was embedded. Per-item
/// resilience belongs to the caller, which can isolate failures at its own
/// persistence boundary instead.
#[derive(Clone)]
pub struct EmbeddingClient {
    provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingClient {
    /// Create a new client over the given provider.
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Get the underlying provider.
    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    /// Generate an embedding for a single text.
    ///
    /// Issues exactly one provider call. No retry is performed here.
    pub async fn embed_one(&self, text: &str) -> Result<Embedding> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let mut vectors = self.provider.embed_call(&[text.to_string()]).await?;

        match vectors.pop() {
            Some(vector) if vectors.is_empty() => Ok(vector),
            _ => Err(EmbeddingError::InvalidResponse(
                "expected exactly one embedding".to_string(),
            )),
        }
    }

    /// Generate embeddings for multiple texts, chunked by `batch_size`.
    ///
    /// Texts are partitioned into chunks of at most `batch_size` and each
    /// chunk is one provider call. On success the result preserves input
    /// order: vector `i` embeds `texts[i]`, across chunk boundaries. Any
    /// chunk failure aborts the whole call with no partial results.
    ///
    /// Callers are responsible for filtering out empty texts beforehand;
    /// an empty text anywhere in the batch is rejected up front.
    pub async fn embed_batch(&self, texts: &[String], batch_size: usize) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        if texts.iter().any(|text| text.trim().is_empty()) {
            return Err(EmbeddingError::EmptyInput);
        }

        let batch_size = batch_size.max(1);
        let mut vectors = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(batch_size) {
            debug!("Embedding chunk of {} texts", chunk.len());
            let chunk_vectors = self.provider.embed_call(chunk).await?;

            if chunk_vectors.len() != chunk.len() {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "chunk returned {} embeddings for {} texts",
                    chunk_vectors.len(),
                    chunk.len()
                )));
            }

            vectors.extend(chunk_vectors);
        }

        info!("Generated {} embeddings in batch", vectors.len());

        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;

    /// Provider double that records call sizes and embeds each text as a
    /// single-element vector derived from its length.
    struct RecordingProvider {
        call_sizes: Mutex<Vec<usize>>,
        fail_on_call: Option<usize>,
    }

    impl RecordingProvider {
        fn new() -> Self {
            Self {
                call_sizes: Mutex::new(Vec::new()),
                fail_on_call: None,
            }
        }

        fn failing_on(call: usize) -> Self {
            Self {
                call_sizes: Mutex::new(Vec::new()),
                fail_on_call: Some(call),
            }
        }

        fn calls(&self) -> Vec<usize> {
            self.call_sizes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EmbeddingProvider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        fn default_model(&self) -> &str {
            "test-model"
        }

        fn default_dimension(&self) -> usize {
            1
        }

        async fn embed_call(&self, texts: &[String]) -> Result<Vec<Embedding>> {
            let call_index = {
                let mut sizes = self.call_sizes.lock().unwrap();
                sizes.push(texts.len());
                sizes.len() - 1
            };

            if self.fail_on_call == Some(call_index) {
                return Err(EmbeddingError::ApiRequest("injected failure".to_string()));
            }

            Ok(texts.iter().map(|t| vec![t.len() as f32]).collect())
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    fn texts_of_lengths(lengths: &[usize]) -> Vec<String> {
        lengths.iter().map(|n| "x".repeat(*n)).collect()
    }

    #[tokio::test]
    async fn test_embed_one() {
        let provider = Arc::new(RecordingProvider::new());
        let client = EmbeddingClient::new(provider.clone());

        let vector = client.embed_one("hello").await.unwrap();
        assert_eq!(vector, vec![5.0]);
        assert_eq!(provider.calls(), vec![1]);
    }

    #[tokio::test]
    async fn test_embed_one_rejects_whitespace() {
        let provider = Arc::new(RecordingProvider::new());
        let client = EmbeddingClient::new(provider.clone());

        let result = client.embed_one("   ").await;
        assert!(matches!(result, Err(EmbeddingError::EmptyInput)));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_embed_batch_chunks_and_preserves_order() {
        let provider = Arc::new(RecordingProvider::new());
        let client = EmbeddingClient::new(provider.clone());

        let texts = texts_of_lengths(&[1, 2, 3, 4, 5, 6, 7]);
        let vectors = client.embed_batch(&texts, 3).await.unwrap();

        assert_eq!(provider.calls(), vec![3, 3, 1]);
        assert_eq!(vectors.len(), texts.len());
        for (i, vector) in vectors.iter().enumerate() {
            assert_eq!(vector, &vec![texts[i].len() as f32]);
        }
    }

    #[tokio::test]
    async fn test_embed_batch_fails_atomically() {
        let provider = Arc::new(RecordingProvider::failing_on(1));
        let client = EmbeddingClient::new(provider.clone());

        let texts = texts_of_lengths(&[1, 2, 3, 4, 5]);
        let result = client.embed_batch(&texts, 2).await;

        assert!(matches!(result, Err(EmbeddingError::ApiRequest(_))));
        // First chunk succeeded upstream but the caller sees no results.
        assert_eq!(provider.calls(), vec![2, 2]);
    }

    #[tokio::test]
    async fn test_embed_batch_rejects_empty_text() {
        let provider = Arc::new(RecordingProvider::new());
        let client = EmbeddingClient::new(provider.clone());

        let texts = vec!["hello".to_string(), " ".to_string()];
        let result = client.embed_batch(&texts, 10).await;

        assert!(matches!(result, Err(EmbeddingError::EmptyInput)));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_embed_batch_empty_input_is_noop() {
        let provider = Arc::new(RecordingProvider::new());
        let client = EmbeddingClient::new(provider.clone());

        let vectors = client.embed_batch(&[], 10).await.unwrap();
        assert!(vectors.is_empty());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_embed_batch_clamps_zero_batch_size() {
        let provider = Arc::new(RecordingProvider::new());
        let client = EmbeddingClient::new(provider.clone());

        let texts = texts_of_lengths(&[1, 2]);
        let vectors = client.embed_batch(&texts, 0).await.unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(provider.calls(), vec![1, 1]);
    }
}
