//! Cohere embedding provider.
//!
//! Calls `POST /v1/embed` with `input_type = "search_query"`, the input
//! type Cohere expects for the query side of a retrieval pair. The corpus
//! embeddings were produced with `search_document`.
//!
//! The API key is wrapped in [`SecretString`] and only exposed when the
//! request header is built.

use linkdex_core::embedding::Embedder;
use linkdex_types::error::EmbeddingProviderError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::http::{check_vector, status_error, transport_error};

const DEFAULT_BASE_URL: &str = "https://api.cohere.com";

pub struct CohereEmbedder {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    dimension: Option<usize>,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    texts: [&'a str; 1],
    model: &'a str,
    input_type: &'static str,
    truncate: &'static str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    embeddings: Vec<Vec<f64>>,
}

impl CohereEmbedder {
    pub fn new(api_key: SecretString, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
            dimension: None,
        }
    }

    /// Override the base URL (proxies, self-hosted gateways).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_dimension(mut self, dimension: Option<usize>) -> Self {
        self.dimension = dimension;
        self
    }

    fn url(&self) -> String {
        format!("{}/v1/embed", self.base_url)
    }

    fn request_body<'a>(&'a self, text: &'a str) -> EmbedRequest<'a> {
        EmbedRequest {
            texts: [text],
            model: &self.model,
            input_type: "search_query",
            truncate: "END",
        }
    }
}

fn parse_response(response: EmbedResponse) -> Result<Vec<f64>, EmbeddingProviderError> {
    let vector = response
        .embeddings
        .into_iter()
        .next()
        .ok_or(EmbeddingProviderError::EmptyResponse)?;
    check_vector(vector)
}

impl Embedder for CohereEmbedder {
    #[tracing::instrument(name = "embed", skip(self, text), fields(provider = "cohere", model = %self.model))]
    async fn embed(&self, text: &str) -> Result<Vec<f64>, EmbeddingProviderError> {
        if text.trim().is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "text must not be blank".to_string(),
            ));
        }

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &headers, body));
        }

        let parsed: EmbedResponse = response.json().await.map_err(|e| {
            EmbeddingProviderError::Deserialization(format!("failed to parse response: {e}"))
        })?;
        parse_response(parsed)
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedder() -> CohereEmbedder {
        CohereEmbedder::new(
            SecretString::from("test-key"),
            "embed-english-v3.0".to_string(),
        )
    }

    #[test]
    fn test_request_body_shape() {
        let embedder = embedder();
        let body = serde_json::to_value(embedder.request_body("rust async")).unwrap();
        assert_eq!(body["texts"], serde_json::json!(["rust async"]));
        assert_eq!(body["model"], "embed-english-v3.0");
        assert_eq!(body["input_type"], "search_query");
    }

    #[test]
    fn test_base_url_override() {
        let embedder = embedder().with_base_url("http://localhost:9000/");
        assert_eq!(embedder.url(), "http://localhost:9000/v1/embed");
    }

    #[test]
    fn test_parse_response_takes_first_embedding() {
        let response: EmbedResponse = serde_json::from_str(
            r#"{"id": "x", "embeddings": [[0.5, -0.5, 1.0]], "texts": ["q"]}"#,
        )
        .unwrap();
        assert_eq!(parse_response(response).unwrap(), vec![0.5, -0.5, 1.0]);
    }

    #[test]
    fn test_parse_response_empty() {
        let response: EmbedResponse = serde_json::from_str(r#"{"embeddings": []}"#).unwrap();
        assert!(matches!(
            parse_response(response),
            Err(EmbeddingProviderError::EmptyResponse)
        ));
        let response: EmbedResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            parse_response(response),
            Err(EmbeddingProviderError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_without_request() {
        let err = embedder().embed("   ").await.unwrap_err();
        assert!(matches!(err, EmbeddingProviderError::InvalidInput(_)));
    }

    #[test]
    fn test_metadata() {
        let embedder = embedder().with_dimension(Some(1024));
        assert_eq!(embedder.model_name(), "embed-english-v3.0");
        assert_eq!(embedder.dimension(), Some(1024));
    }
}
