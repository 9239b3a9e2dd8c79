//! BoxEmbedder -- object-safe dynamic dispatch wrapper for Embedder.
//!
//! 1. Define an object-safe `EmbedderDyn` trait with boxed futures
//! 2. Blanket-impl `EmbedderDyn` for all `T: Embedder`
//! 3. `BoxEmbedder` wraps `Box<dyn EmbedderDyn>` and implements `Embedder`
//!    by delegation, so services generic over `Embedder` accept it

use std::future::Future;
use std::pin::Pin;

use linkdex_types::error::EmbeddingProviderError;

use super::embedder::Embedder;

/// Object-safe version of [`Embedder`] with boxed futures.
pub trait EmbedderDyn: Send + Sync {
    fn embed_boxed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f64>, EmbeddingProviderError>> + Send + 'a>>;

    fn model_name_dyn(&self) -> &str;

    fn dimension_dyn(&self) -> Option<usize>;
}

impl<T: Embedder> EmbedderDyn for T {
    fn embed_boxed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f64>, EmbeddingProviderError>> + Send + 'a>> {
        Box::pin(self.embed(text))
    }

    fn model_name_dyn(&self) -> &str {
        self.model_name()
    }

    fn dimension_dyn(&self) -> Option<usize> {
        self.dimension()
    }
}

/// Type-erased embedder for runtime provider selection.
///
/// Since `Embedder` uses RPITIT, it cannot be used as a trait object
/// directly. The concrete provider is picked from configuration at startup
/// and hidden behind this box.
pub struct BoxEmbedder {
    inner: Box<dyn EmbedderDyn + Send + Sync>,
}

impl BoxEmbedder {
    /// Wrap a concrete `Embedder` in a type-erased box.
    pub fn new<T: Embedder + 'static>(embedder: T) -> Self {
        Self {
            inner: Box::new(embedder),
        }
    }
}

impl Embedder for BoxEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingProviderError> {
        self.inner.embed_boxed(text).await
    }

    fn model_name(&self) -> &str {
        self.inner.model_name_dyn()
    }

    fn dimension(&self) -> Option<usize> {
        self.inner.dimension_dyn()
    }
}
