//! Embedder trait for text-to-vector conversion.

use linkdex_types::error::EmbeddingProviderError;

/// Trait for converting a query string into an embedding vector.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations must not retry internally; retry and timeout policy is
/// layered on by whoever constructs the embedder.
pub trait Embedder: Send + Sync {
    /// Embed a single non-empty text.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f64>, EmbeddingProviderError>> + Send;

    /// The model identifier (e.g., "embed-english-v3.0").
    fn model_name(&self) -> &str;

    /// Output dimension when known from configuration.
    fn dimension(&self) -> Option<usize>;
}
