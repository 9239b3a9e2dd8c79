//! Search service.
//!
//! `SearchService` answers a search request end to end:
//!
//! - blank term: return every record in load order; the embedder and the
//!   ranker are never touched
//! - otherwise: embed the term once, rank the whole corpus, and return all
//!   N records in rank order (no top-k inside the core)
//!
//! The corpus is held as `RwLock<Arc<Corpus>>`. Each request clones the
//! `Arc` once up front and works on that snapshot, so a concurrent
//! [`SearchService::reload`] (which swaps in a freshly built corpus) is
//! never observed half-way. The lock is only held for the clone or the swap,
//! never across an await on the embedder.

use std::sync::Arc;
use std::time::Instant;

use linkdex_types::config::MalformedRowPolicy;
use linkdex_types::error::{EmbeddingProviderError, LoadError, QueryError};
use linkdex_types::record::{CorpusStats, RankedResult};
use tokio::sync::RwLock;

use crate::corpus::{Corpus, CorpusSource, LoadOptions, LoadReport};
use crate::embedding::Embedder;

use super::ranker::rank;

/// Orchestrates embedder, corpus and ranker.
///
/// Generic over the embedder so tests can inject spies; the application
/// pins it to `BoxEmbedder`.
pub struct SearchService<E: Embedder> {
    embedder: E,
    corpus: RwLock<Arc<Corpus>>,
    on_malformed: MalformedRowPolicy,
}

impl<E: Embedder> SearchService<E> {
    /// Create a service over an already-built corpus.
    pub fn new(embedder: E, corpus: Corpus, on_malformed: MalformedRowPolicy) -> Self {
        Self {
            embedder,
            corpus: RwLock::new(Arc::new(corpus)),
            on_malformed,
        }
    }

    /// Load the initial corpus from `source` and create the service.
    ///
    /// The embedder's configured dimension, if any, is enforced on every row.
    pub async fn load<S: CorpusSource>(
        embedder: E,
        source: &S,
        on_malformed: MalformedRowPolicy,
    ) -> Result<Self, LoadError> {
        let options = LoadOptions {
            expected_dimension: embedder.dimension(),
            on_malformed,
        };
        let corpus = Corpus::from_source(source, options).await?;
        Ok(Self::new(embedder, corpus, on_malformed))
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// The corpus currently being served.
    pub async fn snapshot(&self) -> Arc<Corpus> {
        Arc::clone(&*self.corpus.read().await)
    }

    /// Run a search.
    ///
    /// Returns either the complete result set or an error; a provider
    /// failure is never turned into an empty list.
    #[tracing::instrument(name = "search", skip(self, term), fields(term_len = term.len()))]
    pub async fn search(&self, term: &str) -> Result<Vec<RankedResult>, QueryError> {
        let corpus = self.snapshot().await;
        let term = term.trim();

        if term.is_empty() {
            tracing::debug!(records = corpus.len(), "blank term, returning load order");
            return Ok(corpus.records().iter().map(RankedResult::unscored).collect());
        }

        let started = Instant::now();
        let query = self.embedder.embed(term).await.inspect_err(|e| {
            tracing::warn!(error = %e, model = self.embedder.model_name(), "query embedding failed");
        })?;
        let embed_ms = started.elapsed().as_millis() as u64;

        if let Some(expected) = corpus.dimension() {
            if query.len() != expected {
                return Err(EmbeddingProviderError::DimensionMismatch {
                    expected,
                    actual: query.len(),
                }
                .into());
            }
        }

        let ranked = rank(&query, corpus.matrix());
        let records = corpus.records();
        let results: Vec<RankedResult> = ranked
            .into_iter()
            .map(|s| RankedResult::scored(&records[s.index], s.score))
            .collect();

        tracing::debug!(
            results = results.len(),
            embed_ms,
            total_ms = started.elapsed().as_millis() as u64,
            "search ranked"
        );

        Ok(results)
    }

    /// Build a new corpus from `source` and swap it in.
    ///
    /// The new corpus is fully validated before the swap; on error the
    /// current corpus keeps serving.
    #[tracing::instrument(name = "reload", skip(self, source), fields(source = %source.describe()))]
    pub async fn reload<S: CorpusSource>(&self, source: &S) -> Result<LoadReport, LoadError> {
        let options = LoadOptions {
            expected_dimension: self.embedder.dimension(),
            on_malformed: self.on_malformed,
        };
        let corpus = Corpus::from_source(source, options).await?;
        let report = corpus.report().clone();

        *self.corpus.write().await = Arc::new(corpus);
        tracing::info!(records = report.loaded, "corpus swapped");

        Ok(report)
    }

    pub async fn stats(&self) -> CorpusStats {
        let corpus = self.snapshot().await;
        let report = corpus.report();
        CorpusStats {
            records: corpus.len(),
            dimension: corpus.dimension(),
            skipped_rows: report.skipped.len(),
            model: self.embedder.model_name().to_string(),
            source: report.source.clone(),
            loaded_at: report.loaded_at,
        }
    }
}
