//! Corpus sources.
//!
//! [`ConfiguredSource`] picks a concrete source from `[corpus]` in
//! `config.toml` so the rest of the application can stay generic over a
//! single type.

pub mod jsonl;
pub mod sqlite;

use std::path::Path;

use linkdex_core::corpus::CorpusSource;
use linkdex_types::config::{CorpusConfig, SourceKind};
use linkdex_types::error::LoadError;
use linkdex_types::record::RawRow;

use crate::config::resolve_path;

pub use self::jsonl::JsonlCorpusSource;
pub use self::sqlite::SqliteCorpusSource;

/// The corpus source selected by configuration.
pub enum ConfiguredSource {
    Jsonl(JsonlCorpusSource),
    Sqlite(SqliteCorpusSource),
}

impl CorpusSource for ConfiguredSource {
    async fn read_rows(&self) -> Result<Vec<RawRow>, LoadError> {
        match self {
            Self::Jsonl(source) => source.read_rows().await,
            Self::Sqlite(source) => source.read_rows().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Jsonl(source) => source.describe(),
            Self::Sqlite(source) => source.describe(),
        }
    }
}

/// Build the configured source. Relative paths resolve against `data_dir`.
pub fn build_source(config: &CorpusConfig, data_dir: &Path) -> Result<ConfiguredSource, LoadError> {
    let path = resolve_path(data_dir, &config.path);
    match config.source {
        SourceKind::Jsonl => Ok(ConfiguredSource::Jsonl(JsonlCorpusSource::new(path))),
        SourceKind::Sqlite => Ok(ConfiguredSource::Sqlite(SqliteCorpusSource::new(
            path,
            &config.table,
        )?)),
    }
}
