//! Configuration loader for linkdex.
//!
//! Reads `config.toml` from the data directory (`~/.linkdex/` by default)
//! and deserializes it into [`LinkdexConfig`]. Falls back to defaults when
//! the file is missing or malformed. A path given explicitly on the command
//! line must exist and parse.

use std::path::{Path, PathBuf};

use linkdex_types::config::LinkdexConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("invalid embedding configuration: {0}")]
    Embedding(String),
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `LINKDEX_DATA_DIR` environment variable
/// 2. `~/.linkdex`
/// 3. `.linkdex` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("LINKDEX_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".linkdex");
    }

    PathBuf::from(".linkdex")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`LinkdexConfig::default()`].
/// - Unreadable or unparseable file: logs a warning and returns the default.
pub async fn load_config(data_dir: &Path) -> LinkdexConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return LinkdexConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return LinkdexConfig::default();
        }
    };

    match toml::from_str::<LinkdexConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            LinkdexConfig::default()
        }
    }
}

/// Load configuration from an explicit path. Errors are not swallowed.
pub async fn load_config_file(path: &Path) -> Result<LinkdexConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve a configured path against the data directory.
pub fn resolve_path(data_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        data_dir.join(path)
    }
}
