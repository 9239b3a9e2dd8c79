//! The immutable in-memory corpus.
//!
//! A `Corpus` is built once from the rows of a [`CorpusSource`] and is never
//! mutated afterwards. Records and the embedding matrix share indices:
//! record `i`'s embedding is matrix row `i`.
//!
//! Validation rules applied by [`Corpus::load`]:
//! - a blank URL, an unparseable date or a missing/empty/non-finite
//!   embedding makes a row malformed (rejected or skipped per policy)
//! - a blank title falls back to the URL
//! - an embedding whose length differs from the corpus dimension is always
//!   fatal

pub mod matrix;
pub mod source;

use chrono::{DateTime, Utc};
use linkdex_types::config::MalformedRowPolicy;
use linkdex_types::error::LoadError;
use linkdex_types::record::{RawRow, Record, parse_published_at};

pub use self::matrix::EmbeddingMatrix;
pub use self::source::CorpusSource;

/// Options controlling validation during load.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Dimension every embedding must have. When `None`, the first valid
    /// row decides.
    pub expected_dimension: Option<usize>,
    pub on_malformed: MalformedRowPolicy,
}

/// What happened during a load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub source: String,
    pub loaded: usize,
    /// Source row indices dropped under [`MalformedRowPolicy::Skip`].
    pub skipped: Vec<usize>,
    pub dimension: Option<usize>,
    pub loaded_at: DateTime<Utc>,
}

/// Immutable snapshot of link records and their embeddings.
#[derive(Debug, Clone)]
pub struct Corpus {
    records: Vec<Record>,
    matrix: EmbeddingMatrix,
    report: LoadReport,
}

impl Corpus {
    /// An empty corpus, served before anything has been loaded.
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            matrix: EmbeddingMatrix::default(),
            report: LoadReport {
                source: "empty".to_string(),
                loaded: 0,
                skipped: Vec::new(),
                dimension: None,
                loaded_at: Utc::now(),
            },
        }
    }

    /// Read all rows from `source` and build a validated corpus.
    pub async fn from_source<S: CorpusSource>(
        source: &S,
        options: LoadOptions,
    ) -> Result<Self, LoadError> {
        let rows = source.read_rows().await?;
        Self::load(source.describe(), rows, options)
    }

    /// Build a corpus from raw rows.
    pub fn load(
        source: impl Into<String>,
        rows: Vec<RawRow>,
        options: LoadOptions,
    ) -> Result<Self, LoadError> {
        let source = source.into();
        let mut records = Vec::with_capacity(rows.len());
        let mut matrix: Option<EmbeddingMatrix> = options
            .expected_dimension
            .map(|dim| EmbeddingMatrix::with_dimension(dim, rows.len()));
        let mut skipped = Vec::new();
        let capacity = rows.len();

        for (index, row) in rows.into_iter().enumerate() {
            let (record, embedding) = match validate_row(row) {
                Ok(valid) => valid,
                Err(reason) => match options.on_malformed {
                    MalformedRowPolicy::Reject => {
                        return Err(LoadError::MalformedRow { index, reason });
                    }
                    MalformedRowPolicy::Skip => {
                        tracing::warn!(index, %reason, "skipping malformed corpus row");
                        skipped.push(index);
                        continue;
                    }
                },
            };

            let matrix = matrix.get_or_insert_with(|| {
                EmbeddingMatrix::with_dimension(embedding.len(), capacity)
            });
            if embedding.len() != matrix.dimension() {
                return Err(LoadError::DimensionMismatch {
                    index,
                    expected: matrix.dimension(),
                    actual: embedding.len(),
                });
            }

            matrix.push(&embedding);
            records.push(record);
        }

        let matrix = matrix.unwrap_or_default();
        let dimension = (!records.is_empty()).then(|| matrix.dimension());

        tracing::info!(
            %source,
            records = records.len(),
            skipped = skipped.len(),
            ?dimension,
            "corpus loaded"
        );

        let report = LoadReport {
            source,
            loaded: records.len(),
            skipped,
            dimension,
            loaded_at: Utc::now(),
        };

        Ok(Self {
            records,
            matrix,
            report,
        })
    }

    /// Number of records (N).
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Embedding dimension (D), or `None` for an empty corpus.
    pub fn dimension(&self) -> Option<usize> {
        self.report.dimension
    }

    /// All records in load order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn matrix(&self) -> &EmbeddingMatrix {
        &self.matrix
    }

    /// Embedding of record `index`.
    pub fn embedding(&self, index: usize) -> &[f64] {
        self.matrix.row(index)
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}

fn validate_row(row: RawRow) -> Result<(Record, Vec<f64>), String> {
    if let Some(reason) = row.parse_error {
        return Err(reason);
    }

    let url = row
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| "missing url".to_string())?;

    let title = row
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| url.clone());

    let raw_date = row.date.ok_or_else(|| "missing date".to_string())?;
    let published_at =
        parse_published_at(&raw_date).ok_or_else(|| format!("unparseable date '{raw_date}'"))?;

    let embedding = row
        .embedding
        .filter(|e| !e.is_empty())
        .ok_or_else(|| "missing embedding".to_string())?;
    if let Some(pos) = embedding.iter().position(|v| !v.is_finite()) {
        return Err(format!("non-finite embedding value at position {pos}"));
    }

    Ok((
        Record {
            title,
            url,
            published_at,
        },
        embedding,
    ))
}
