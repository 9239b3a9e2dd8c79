//! Application state wiring the search service to its concrete parts.
//!
//! `SearchService` is generic over the embedder; AppState pins it to the
//! configured, type-erased provider and keeps the corpus source around so
//! `POST /api/v1/reload` can rebuild from it.

use std::path::PathBuf;
use std::sync::Arc;

use linkdex_core::embedding::{BoxEmbedder, Embedder};
use linkdex_core::search::SearchService;
use linkdex_infra::embedding::build_embedder;
use linkdex_infra::source::{ConfiguredSource, build_source};
use linkdex_types::config::LinkdexConfig;

pub type ConcreteSearchService = SearchService<BoxEmbedder>;

/// Shared application state. Used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub search_service: Arc<ConcreteSearchService>,
    pub source: Arc<ConfiguredSource>,
    pub config: Arc<LinkdexConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Build the embedder, load the corpus and wire the search service.
    ///
    /// A corpus that fails to load is fatal: nothing is served from a
    /// partial snapshot.
    pub async fn init(config: LinkdexConfig, data_dir: PathBuf) -> anyhow::Result<Self> {
        let embedder = build_embedder(&config.embedding)?;
        let source = build_source(&config.corpus, &data_dir)?;

        let search_service =
            SearchService::load(embedder, &source, config.corpus.on_malformed).await?;

        let stats = search_service.stats().await;
        tracing::info!(
            records = stats.records,
            dimension = ?stats.dimension,
            skipped = stats.skipped_rows,
            source = %stats.source,
            model = %search_service.embedder().model_name(),
            "search service ready"
        );

        Ok(Self {
            search_service: Arc::new(search_service),
            source: Arc::new(source),
            config: Arc::new(config),
            data_dir,
        })
    }
}
