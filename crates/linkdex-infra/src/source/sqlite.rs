//! SQLite corpus source.
//!
//! Reads `title`, `url`, `date` and `embedding` (a JSON array stored as
//! text) from a table in an existing database, opened read-only. Rows come
//! back in `rowid` order so ties rank the same way on every load.

use std::path::PathBuf;

use linkdex_core::corpus::CorpusSource;
use linkdex_types::error::LoadError;
use linkdex_types::record::RawRow;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub struct SqliteCorpusSource {
    path: PathBuf,
    table: String,
}

impl SqliteCorpusSource {
    /// Create a source for `table` in the database at `path`.
    ///
    /// The table name is interpolated into SQL, so it must be a plain
    /// identifier.
    pub fn new(path: impl Into<PathBuf>, table: &str) -> Result<Self, LoadError> {
        if !is_identifier(table) {
            return Err(LoadError::Config(format!("invalid table name '{table}'")));
        }
        Ok(Self {
            path: path.into(),
            table: table.to_string(),
        })
    }
}

impl CorpusSource for SqliteCorpusSource {
    async fn read_rows(&self) -> Result<Vec<RawRow>, LoadError> {
        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| {
                LoadError::Source(format!("failed to open {}: {e}", self.path.display()))
            })?;

        let sql = format!(
            "SELECT title, url, date, embedding FROM \"{}\" ORDER BY rowid",
            self.table
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&pool)
            .await
            .map_err(|e| LoadError::Source(format!("failed to query {}: {e}", self.table)))?;

        let mut out = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            out.push(raw_row(index, row).map_err(|e| {
                LoadError::Source(format!("row {index} of {}: {e}", self.table))
            })?);
        }

        pool.close().await;
        Ok(out)
    }

    fn describe(&self) -> String {
        format!("sqlite:{}#{}", self.path.display(), self.table)
    }
}

fn raw_row(index: usize, row: &sqlx::sqlite::SqliteRow) -> Result<RawRow, sqlx::Error> {
    let embedding_text: Option<String> = row.try_get("embedding")?;
    let (embedding, parse_error) = match embedding_text {
        Some(text) => match serde_json::from_str::<Vec<f64>>(&text) {
            Ok(vector) => (Some(vector), None),
            Err(e) => {
                tracing::debug!(index, error = %e, "embedding column is not a JSON array");
                (
                    None,
                    Some(format!("embedding is not a JSON array of numbers: {e}")),
                )
            }
        },
        None => (None, None),
    };

    Ok(RawRow {
        title: row.try_get("title")?,
        url: row.try_get("url")?,
        date: row.try_get("date")?,
        embedding,
        parse_error,
    })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
