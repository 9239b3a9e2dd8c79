//! Response handling shared by the HTTP embedding providers.

use linkdex_types::error::EmbeddingProviderError;
use reqwest::header::{HeaderMap, RETRY_AFTER};

/// Map a failed provider response onto [`EmbeddingProviderError`].
///
/// 401 and 403 are authentication failures, 429 is a rate limit carrying
/// the `Retry-After` delay when the provider sent one, and anything else
/// keeps its status code.
pub(crate) fn status_error(status: u16, headers: &HeaderMap, body: String) -> EmbeddingProviderError {
    match status {
        401 | 403 => EmbeddingProviderError::Authentication,
        429 => EmbeddingProviderError::RateLimited {
            retry_after_ms: retry_after_ms(headers),
        },
        _ => EmbeddingProviderError::Provider {
            status,
            message: truncate(body, 512),
        },
    }
}

/// Convert a transport failure into an error variant.
pub(crate) fn transport_error(err: reqwest::Error) -> EmbeddingProviderError {
    if err.is_decode() {
        EmbeddingProviderError::Deserialization(err.to_string())
    } else {
        EmbeddingProviderError::Network(err.to_string())
    }
}

/// `Retry-After` in delta-seconds, converted to milliseconds.
///
/// The HTTP-date form is ignored.
pub(crate) fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| (secs * 1000.0) as u64)
}

/// Reject empty or non-finite vectors before they reach the ranker.
pub(crate) fn check_vector(vector: Vec<f64>) -> Result<Vec<f64>, EmbeddingProviderError> {
    if vector.is_empty() {
        return Err(EmbeddingProviderError::EmptyResponse);
    }
    if vector.iter().any(|v| !v.is_finite()) {
        return Err(EmbeddingProviderError::Deserialization(
            "embedding contains non-finite values".to_string(),
        ));
    }
    Ok(vector)
}

fn truncate(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut end = max;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("...");
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_auth_statuses() {
        let headers = HeaderMap::new();
        assert!(matches!(
            status_error(401, &headers, String::new()),
            EmbeddingProviderError::Authentication
        ));
        assert!(matches!(
            status_error(403, &headers, String::new()),
            EmbeddingProviderError::Authentication
        ));
    }

    #[test]
    fn test_rate_limit_reads_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("2"));
        match status_error(429, &headers, String::new()) {
            EmbeddingProviderError::RateLimited { retry_after_ms } => {
                assert_eq!(retry_after_ms, Some(2000));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn test_retry_after_http_date_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(retry_after_ms(&headers), None);
    }

    #[test]
    fn test_other_status_keeps_code_and_truncates_body() {
        let body = "x".repeat(2000);
        match status_error(503, &HeaderMap::new(), body) {
            EmbeddingProviderError::Provider { status, message } => {
                assert_eq!(status, 503);
                assert!(message.len() <= 515);
                assert!(message.ends_with("..."));
            }
            other => panic!("expected Provider, got {other:?}"),
        }
    }

    #[test]
    fn test_check_vector() {
        assert!(check_vector(vec![0.1, 0.2]).is_ok());
        assert!(matches!(
            check_vector(Vec::new()),
            Err(EmbeddingProviderError::EmptyResponse)
        ));
        assert!(matches!(
            check_vector(vec![0.1, f64::NAN]),
            Err(EmbeddingProviderError::Deserialization(_))
        ));
    }
}
