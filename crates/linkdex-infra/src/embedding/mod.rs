//! Embedding provider implementations.
//!
//! [`build_embedder`] constructs the configured provider and wraps it with
//! a per-request timeout and, when `max_retries > 0`, a retry policy for
//! transient failures. The result is type-erased into a [`BoxEmbedder`].

pub mod cohere;
pub(crate) mod http;
pub mod openai;
pub mod retry;
pub mod timeout;

use std::time::Duration;

use linkdex_core::embedding::BoxEmbedder;
use linkdex_types::config::{EmbeddingConfig, ProviderKind};
use secrecy::SecretString;

use crate::config::ConfigError;

pub use self::cohere::CohereEmbedder;
pub use self::openai::OpenAiEmbedder;
pub use self::retry::RetryingEmbedder;
pub use self::timeout::TimeoutEmbedder;

/// Build the configured embedder, reading the API key from the environment.
pub fn build_embedder(config: &EmbeddingConfig) -> Result<BoxEmbedder, ConfigError> {
    let var = config.api_key_env_or_default();
    let key = std::env::var(var)
        .ok()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingApiKey(var.to_string()))?;
    create_embedder(config, SecretString::from(key))
}

/// Build the configured embedder with an already resolved API key.
pub fn create_embedder(
    config: &EmbeddingConfig,
    api_key: SecretString,
) -> Result<BoxEmbedder, ConfigError> {
    if config.timeout_secs == 0 {
        return Err(ConfigError::Embedding(
            "timeout_secs must be greater than zero".to_string(),
        ));
    }
    if config.dimension == Some(0) {
        return Err(ConfigError::Embedding(
            "dimension must be greater than zero".to_string(),
        ));
    }

    let model = config.model_or_default().to_string();
    let timeout = Duration::from_secs(config.timeout_secs);

    tracing::debug!(
        provider = ?config.provider,
        model = %model,
        timeout_secs = config.timeout_secs,
        max_retries = config.max_retries,
        "building embedder"
    );

    match config.provider {
        ProviderKind::Cohere => {
            let mut provider = CohereEmbedder::new(api_key, model).with_dimension(config.dimension);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.as_str());
            }
            Ok(wrap(provider, timeout, config.max_retries))
        }
        ProviderKind::Openai => {
            let mut provider = OpenAiEmbedder::new(api_key, model).with_dimension(config.dimension);
            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.as_str());
            }
            Ok(wrap(provider, timeout, config.max_retries))
        }
    }
}

fn wrap<E>(provider: E, timeout: Duration, max_retries: u32) -> BoxEmbedder
where
    E: linkdex_core::embedding::Embedder + 'static,
{
    let timed = TimeoutEmbedder::new(provider, timeout);
    if max_retries > 0 {
        BoxEmbedder::new(RetryingEmbedder::new(timed, max_retries))
    } else {
        BoxEmbedder::new(timed)
    }
}
