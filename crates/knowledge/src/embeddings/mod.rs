//! Embedding generation for corpus chunks and queries.
//!
//! [`Embedder`] wraps a provider with batching, a per-call timeout and
//! response validation. Failures are never retried.

pub mod provider;
pub mod providers;

pub use provider::{create_provider, EmbeddingProvider};
pub use providers::{MockProvider, OpenAiEmbeddingProvider};

use crate::progress::ProgressReporter;
use podium_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Batching, validating front-end over an [`EmbeddingProvider`].
#[derive(Debug, Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
    timeout: Duration,
}

impl Embedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, batch_size: usize, timeout: Duration) -> Self {
        Self {
            provider,
            batch_size: batch_size.max(1),
            timeout,
        }
    }

    pub fn provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.provider
    }

    /// Embed texts in batches; returns one vector per input, same order.
    pub async fn embed_texts(
        &self,
        texts: &[String],
        progress: &ProgressReporter,
    ) -> AppResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        tracing::info!(
            "Embedding {} texts using provider '{}' (model: {})",
            texts.len(),
            self.provider.provider_name(),
            self.provider.model_name()
        );

        let total = texts.len() as u64;
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            let vectors = self.call(batch).await?;
            if vectors.len() != batch.len() {
                return Err(AppError::EmbeddingService(format!(
                    "Provider returned {} embeddings for {} inputs",
                    vectors.len(),
                    batch.len()
                )));
            }
            embeddings.extend(vectors);
            progress.embed(
                embeddings.len() as u64,
                Some(total),
                self.provider.model_name(),
            );
        }

        self.validate_dimensions(&embeddings)?;

        tracing::debug!(
            "Generated {} embeddings of dimension {}",
            embeddings.len(),
            self.provider.dimensions()
        );

        Ok(embeddings)
    }

    /// Embed a single query string.
    pub async fn embed_query(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut vectors = self.call(&[text.to_string()]).await?;
        if vectors.len() != 1 {
            return Err(AppError::EmbeddingService(format!(
                "Expected one query embedding, got {}",
                vectors.len()
            )));
        }
        let vector = vectors.remove(0);

        self.validate_dimensions(std::slice::from_ref(&vector))?;
        Ok(vector)
    }

    async fn call(&self, batch: &[String]) -> AppResult<Vec<Vec<f32>>> {
        tokio::time::timeout(self.timeout, self.provider.embed_batch(batch))
            .await
            .map_err(|_| AppError::Timeout {
                operation: "embedding request".to_string(),
                secs: self.timeout.as_secs(),
            })?
    }

    fn validate_dimensions(&self, vectors: &[Vec<f32>]) -> AppResult<()> {
        let expected = self.provider.dimensions();
        if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
            return Err(AppError::EmbeddingService(format!(
                "Unexpected embedding dimensions: got {}, expected {}",
                bad.len(),
                expected
            )));
        }
        Ok(())
    }
}
