//! Retry wrapper for transient embedding failures.
//!
//! Only errors for which [`EmbeddingProviderError::is_transient`] holds are
//! retried. Delays grow exponentially from `base_delay` up to `max_delay`;
//! a rate-limit response carrying `Retry-After` uses that delay instead.

use std::time::Duration;

use linkdex_core::embedding::Embedder;
use linkdex_types::error::EmbeddingProviderError;

const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(250);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(5);

pub struct RetryingEmbedder<E> {
    inner: E,
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl<E: Embedder> RetryingEmbedder<E> {
    pub fn new(inner: E, max_retries: u32) -> Self {
        Self {
            inner,
            max_retries,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }

    pub fn with_delays(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self
    }

    fn delay_for(&self, attempt: u32, err: &EmbeddingProviderError) -> Duration {
        if let EmbeddingProviderError::RateLimited {
            retry_after_ms: Some(ms),
        } = err
        {
            return Duration::from_millis(*ms).min(self.max_delay);
        }
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl<E: Embedder> Embedder for RetryingEmbedder<E> {
    async fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingProviderError> {
        let mut attempt = 0;
        loop {
            match self.inner.embed(text).await {
                Ok(vector) => return Ok(vector),
                Err(err) if err.is_transient() && attempt < self.max_retries => {
                    let delay = self.delay_for(attempt, &err);
                    tracing::warn!(
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient embedding failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Returns queued errors first, then succeeds.
    struct Flaky {
        failures: Mutex<Vec<EmbeddingProviderError>>,
        calls: AtomicU32,
    }

    impl Flaky {
        fn new(mut failures: Vec<EmbeddingProviderError>) -> Self {
            failures.reverse();
            Self {
                failures: Mutex::new(failures),
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Embedder for Flaky {
        async fn embed(&self, _text: &str) -> Result<Vec<f64>, EmbeddingProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.failures.lock().unwrap().pop() {
                Some(err) => Err(err),
                None => Ok(vec![1.0, 0.0]),
            }
        }

        fn model_name(&self) -> &str {
            "flaky"
        }

        fn dimension(&self) -> Option<usize> {
            None
        }
    }

    fn unavailable() -> EmbeddingProviderError {
        EmbeddingProviderError::Provider {
            status: 503,
            message: "unavailable".to_string(),
        }
    }

    fn fast(inner: Flaky, retries: u32) -> RetryingEmbedder<Flaky> {
        RetryingEmbedder::new(inner, retries)
            .with_delays(Duration::from_millis(1), Duration::from_millis(5))
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let embedder = fast(
            Flaky::new(vec![
                unavailable(),
                EmbeddingProviderError::Network("reset".into()),
            ]),
            3,
        );
        assert_eq!(embedder.embed("q").await.unwrap(), vec![1.0, 0.0]);
        assert_eq!(embedder.inner.calls(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let embedder = fast(Flaky::new(vec![unavailable(), unavailable(), unavailable()]), 2);
        let err = embedder.embed("q").await.unwrap_err();
        assert!(matches!(err, EmbeddingProviderError::Provider { status: 503, .. }));
        assert_eq!(embedder.inner.calls(), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let embedder = fast(Flaky::new(vec![EmbeddingProviderError::Authentication]), 5);
        let err = embedder.embed("q").await.unwrap_err();
        assert!(matches!(err, EmbeddingProviderError::Authentication));
        assert_eq!(embedder.inner.calls(), 1);
    }

    #[test]
    fn test_delay_growth_and_retry_after() {
        let embedder = RetryingEmbedder::new(Flaky::new(Vec::new()), 5)
            .with_delays(Duration::from_millis(100), Duration::from_secs(1));
        let err = unavailable();
        assert_eq!(embedder.delay_for(0, &err), Duration::from_millis(100));
        assert_eq!(embedder.delay_for(2, &err), Duration::from_millis(400));
        assert_eq!(embedder.delay_for(10, &err), Duration::from_secs(1));

        let limited = EmbeddingProviderError::RateLimited {
            retry_after_ms: Some(700),
        };
        assert_eq!(embedder.delay_for(0, &limited), Duration::from_millis(700));
    }
}
