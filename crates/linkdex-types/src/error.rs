use std::time::Duration;

use thiserror::Error;

/// Errors raised while building a corpus from its source.
///
/// Always fatal at startup: the process must not serve a partially
/// loaded corpus.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("corpus source error: {0}")]
    Source(String),

    #[error("malformed row {index}: {reason}")]
    MalformedRow { index: usize, reason: String },

    #[error("row {index} has embedding dimension {actual}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid corpus configuration: {0}")]
    Config(String),
}

/// Errors from the external embedding provider.
///
/// Recoverable per request; surfaced to the caller as a failed search.
#[derive(Debug, Error)]
pub enum EmbeddingProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed")]
    Authentication,

    #[error("rate limited")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("failed to decode provider response: {0}")]
    Deserialization(String),

    #[error("embedding request timed out after {0:?}")]
    Timeout(Duration),

    #[error("provider returned no embedding")]
    EmptyResponse,

    #[error("query embedding has dimension {actual}, corpus expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid embedding input: {0}")]
    InvalidInput(String),
}

impl EmbeddingProviderError {
    /// Whether a retry of the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            EmbeddingProviderError::Network(_)
            | EmbeddingProviderError::RateLimited { .. }
            | EmbeddingProviderError::Timeout(_) => true,
            EmbeddingProviderError::Provider { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Errors from the search pipeline, returned at the query-service boundary.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("embedding failed: {0}")]
    Embedding(#[from] EmbeddingProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = LoadError::DimensionMismatch {
            index: 3,
            expected: 1024,
            actual: 768,
        };
        assert_eq!(
            err.to_string(),
            "row 3 has embedding dimension 768, expected 1024"
        );
    }

    #[test]
    fn test_query_error_wraps_provider_error() {
        let err: QueryError = EmbeddingProviderError::Authentication.into();
        assert!(matches!(
            err,
            QueryError::Embedding(EmbeddingProviderError::Authentication)
        ));
        assert_eq!(err.to_string(), "embedding failed: authentication failed");
    }

    #[test]
    fn test_transient_classification() {
        assert!(EmbeddingProviderError::Timeout(Duration::from_secs(5)).is_transient());
        assert!(EmbeddingProviderError::RateLimited { retry_after_ms: None }.is_transient());
        assert!(
            EmbeddingProviderError::Provider {
                status: 503,
                message: "unavailable".into()
            }
            .is_transient()
        );
        assert!(
            !EmbeddingProviderError::Provider {
                status: 400,
                message: "bad request".into()
            }
            .is_transient()
        );
        assert!(!EmbeddingProviderError::Authentication.is_transient());
    }
}
