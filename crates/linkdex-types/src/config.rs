//! Configuration types for linkdex.
//!
//! `LinkdexConfig` represents the top-level `config.toml`: where the corpus
//! comes from, which embedding provider to call, and how the HTTP server
//! binds. All fields have defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.linkdex/config.toml` unless `--config` points elsewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkdexConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Truncation applied by the HTTP layer when the request has no `limit`.
    /// `None` returns the full ranking.
    #[serde(default)]
    pub default_limit: Option<usize>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_limit: None,
        }
    }
}

/// Which kind of store the corpus snapshot is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Jsonl,
    Sqlite,
}

/// What to do with a row that is missing its URL, date or embedding.
///
/// Dimension mismatches are fatal under either policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    #[default]
    Reject,
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    #[serde(default = "default_source")]
    pub source: SourceKind,
    /// Path to the JSON-lines file or SQLite database. Relative paths are
    /// resolved against the data directory.
    #[serde(default = "default_corpus_path")]
    pub path: PathBuf,
    /// Table name for the SQLite source.
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default)]
    pub on_malformed: MalformedRowPolicy,
}

fn default_source() -> SourceKind {
    SourceKind::Jsonl
}

fn default_corpus_path() -> PathBuf {
    PathBuf::from("links.jsonl")
}

fn default_table() -> String {
    "links".to_string()
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            path: default_corpus_path(),
            table: default_table(),
            on_malformed: MalformedRowPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Cohere,
    Openai,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,
    /// Model identifier; defaults per provider when absent.
    #[serde(default)]
    pub model: Option<String>,
    /// Override the provider's base URL (proxies, compatible servers).
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Expected embedding dimension. When absent the corpus decides.
    #[serde(default)]
    pub dimension: Option<usize>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Retries for transient provider failures. Zero disables retrying.
    #[serde(default)]
    pub max_retries: u32,
}

fn default_provider() -> ProviderKind {
    ProviderKind::Cohere
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            base_url: None,
            api_key_env: None,
            dimension: None,
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
        }
    }
}

impl EmbeddingConfig {
    /// The configured model, or the provider's default.
    pub fn model_or_default(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) => model,
            (None, ProviderKind::Cohere) => "embed-english-v3.0",
            (None, ProviderKind::Openai) => "text-embedding-3-small",
        }
    }

    /// The configured API-key variable, or the provider's conventional one.
    pub fn api_key_env_or_default(&self) -> &str {
        match (&self.api_key_env, self.provider) {
            (Some(var), _) => var,
            (None, ProviderKind::Cohere) => "COHERE_API_KEY",
            (None, ProviderKind::Openai) => "OPENAI_API_KEY",
        }
    }
}
