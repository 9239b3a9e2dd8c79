//! OpenAI-compatible embedding provider.
//!
//! Calls `POST {base_url}/embeddings`. Works with OpenAI itself and with
//! compatible servers (Ollama, vLLM, LM Studio) through `base_url`.

use linkdex_core::embedding::Embedder;
use linkdex_types::error::EmbeddingProviderError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::http::{check_vector, status_error, transport_error};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    dimension: Option<usize>,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f64>,
}

impl OpenAiEmbedder {
    pub fn new(api_key: SecretString, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model,
            dimension: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Expected output dimension. Also sent as `dimensions` so models with
    /// Matryoshka embeddings shorten their output to match the corpus.
    pub fn with_dimension(mut self, dimension: Option<usize>) -> Self {
        self.dimension = dimension;
        self
    }

    fn url(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }

    fn request_body<'a>(&'a self, text: &'a str) -> EmbeddingsRequest<'a> {
        EmbeddingsRequest {
            model: &self.model,
            input: text,
            dimensions: self.dimension,
        }
    }
}

fn parse_response(response: EmbeddingsResponse) -> Result<Vec<f64>, EmbeddingProviderError> {
    let data = response
        .data
        .into_iter()
        .next()
        .ok_or(EmbeddingProviderError::EmptyResponse)?;
    check_vector(data.embedding)
}

impl Embedder for OpenAiEmbedder {
    #[tracing::instrument(name = "embed", skip(self, text), fields(provider = "openai", model = %self.model))]
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

        let parsed: EmbeddingsResponse = response.json().await.map_err(|e| {
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

    fn embedder() -> OpenAiEmbedder {
        OpenAiEmbedder::new(
            SecretString::from("sk-test"),
            "text-embedding-3-small".to_string(),
        )
    }

    #[test]
    fn test_request_body_omits_unset_dimensions() {
        let embedder = embedder();
        let body = serde_json::to_value(embedder.request_body("hello")).unwrap();
        assert_eq!(body["model"], "text-embedding-3-small");
        assert_eq!(body["input"], "hello");
        assert!(body.get("dimensions").is_none());
    }

    #[test]
    fn test_request_body_sends_dimensions() {
        let embedder = embedder().with_dimension(Some(256));
        let body = serde_json::to_value(embedder.request_body("hello")).unwrap();
        assert_eq!(body["dimensions"], 256);
    }

    #[test]
    fn test_url_with_compatible_server() {
        let embedder = embedder().with_base_url("http://localhost:11434/v1/");
        assert_eq!(embedder.url(), "http://localhost:11434/v1/embeddings");
    }

    #[test]
    fn test_parse_response() {
        let response: EmbeddingsResponse = serde_json::from_str(
            r#"{"object": "list", "data": [{"object": "embedding", "index": 0, "embedding": [0.25, 0.75]}], "model": "m"}"#,
        )
        .unwrap();
        assert_eq!(parse_response(response).unwrap(), vec![0.25, 0.75]);
    }

    #[test]
    fn test_parse_response_without_data() {
        let response: EmbeddingsResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(matches!(
            parse_response(response),
            Err(EmbeddingProviderError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_without_request() {
        let err = embedder().embed("").await.unwrap_err();
        assert!(matches!(err, EmbeddingProviderError::InvalidInput(_)));
    }
}
