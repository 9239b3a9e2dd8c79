//! Per-request deadline for an embedder.

use std::time::Duration;

use linkdex_core::embedding::Embedder;
use linkdex_types::error::EmbeddingProviderError;

/// Fails an `embed` call with [`EmbeddingProviderError::Timeout`] when the
/// wrapped provider does not answer within `timeout`.
pub struct TimeoutEmbedder<E> {
    inner: E,
    timeout: Duration,
}

impl<E: Embedder> TimeoutEmbedder<E> {
    pub fn new(inner: E, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

impl<E: Embedder> Embedder for TimeoutEmbedder<E> {
    async fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingProviderError> {
        match tokio::time::timeout(self.timeout, self.inner.embed(text)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "embedding request timed out");
                Err(EmbeddingProviderError::Timeout(self.timeout))
            }
        }
    }

    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    fn dimension(&self) -> Option<usize> {
        self.inner.dimension()
    }
}
