//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use linkdex_types::error::{EmbeddingProviderError, LoadError, QueryError};

use super::response::{ApiResponse, request_id};

#[derive(Debug)]
pub enum AppError {
    /// A search whose query could not be embedded.
    Query(QueryError),
    /// A reload whose new corpus failed validation.
    Load(LoadError),
    Validation(String),
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        AppError::Query(e)
    }
}

impl From<LoadError> for AppError {
    fn from(e: LoadError) -> Self {
        AppError::Load(e)
    }
}

impl AppError {
    /// Status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Query(QueryError::Embedding(EmbeddingProviderError::Timeout(_))) => {
                (StatusCode::GATEWAY_TIMEOUT, "EMBEDDING_TIMEOUT")
            }
            AppError::Query(QueryError::Embedding(EmbeddingProviderError::DimensionMismatch {
                ..
            })) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "EMBEDDING_DIMENSION_MISMATCH",
            ),
            AppError::Query(QueryError::Embedding(_)) => {
                (StatusCode::BAD_GATEWAY, "EMBEDDING_PROVIDER_ERROR")
            }
            AppError::Load(_) => (StatusCode::UNPROCESSABLE_ENTITY, "CORPUS_LOAD_ERROR"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Query(e) => e.to_string(),
            AppError::Load(e) => e.to_string(),
            AppError::Validation(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(code, error = %message, "request failed");
        } else {
            tracing::warn!(code, error = %message, "request rejected");
        }

        let body = ApiResponse::error(code, &message, request_id());
        let mut response = body.into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn query(e: EmbeddingProviderError) -> AppError {
        AppError::Query(QueryError::Embedding(e))
    }

    #[test]
    fn test_provider_failures_are_bad_gateway() {
        for err in [
            EmbeddingProviderError::Authentication,
            EmbeddingProviderError::RateLimited {
                retry_after_ms: Some(1000),
            },
            EmbeddingProviderError::Network("reset".into()),
            EmbeddingProviderError::Provider {
                status: 500,
                message: "boom".into(),
            },
            EmbeddingProviderError::EmptyResponse,
        ] {
            let response = query(err).into_response();
            assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn test_timeout_is_gateway_timeout() {
        let response = query(EmbeddingProviderError::Timeout(Duration::from_secs(10))).into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_dimension_mismatch_is_internal() {
        let err = query(EmbeddingProviderError::DimensionMismatch {
            expected: 1024,
            actual: 768,
        });
        assert_eq!(
            err.status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "EMBEDDING_DIMENSION_MISMATCH")
        );
    }

    #[test]
    fn test_load_error_is_unprocessable() {
        let err = AppError::from(LoadError::Source("missing".into()));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_error_body_has_no_response_time() {
        let response = AppError::Validation("q must not be empty".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["errors"][0]["code"], "VALIDATION_ERROR");
        assert!(value["meta"].get("response_time_ms").is_none());
    }
}
