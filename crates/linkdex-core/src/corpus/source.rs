//! Corpus source trait.
//!
//! A source produces the raw rows of a corpus snapshot. Implementations
//! (JSON-lines file, SQLite table) live in linkdex-infra.

use linkdex_types::error::LoadError;
use linkdex_types::record::RawRow;

/// Trait for reading the persisted link snapshot.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Row order defines corpus order and therefore tie-breaking, so
/// implementations must return rows in a stable order.
pub trait CorpusSource: Send + Sync {
    /// Read every row of the snapshot, unvalidated.
    fn read_rows(&self) -> impl std::future::Future<Output = Result<Vec<RawRow>, LoadError>> + Send;

    /// Human-readable description for logs and stats (e.g. a file path).
    fn describe(&self) -> String;
}
