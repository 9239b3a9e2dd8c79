//! Link record types.
//!
//! A `RawRow` is what a corpus source hands over before validation. The
//! corpus turns valid rows into `Record`s and keeps their embeddings in a
//! dense matrix. Search results are `RankedResult`s, which serialize to the
//! `{url, title, date}` wire shape.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// An unvalidated row as read from a corpus source.
///
/// Field aliases accept the column names used by the mail harvester
/// (`subject`, `link`, `embeddings`) and the record store (`ogdate`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRow {
    #[serde(default, alias = "subject")]
    pub title: Option<String>,
    #[serde(default, alias = "link")]
    pub url: Option<String>,
    #[serde(default, alias = "published_at", alias = "ogdate")]
    pub date: Option<String>,
    #[serde(default, alias = "embeddings")]
    pub embedding: Option<Vec<f64>>,
    /// Set by a source when the stored row could not be decoded into the
    /// fields above. The corpus treats the row as malformed with this reason.
    #[serde(skip)]
    pub parse_error: Option<String>,
}

impl RawRow {
    /// A row that could not be decoded, carrying the reason.
    pub fn undecodable(reason: impl Into<String>) -> Self {
        Self {
            parse_error: Some(reason.into()),
            ..Self::default()
        }
    }
}

/// A validated link record. Its embedding lives in the corpus matrix at the
/// same index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub title: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
}

/// One entry of a search response.
///
/// `score` is internal ranking state: it is `None` on the browse-all path
/// and is never serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub title: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub score: Option<f64>,
}

impl RankedResult {
    pub fn unscored(record: &Record) -> Self {
        Self {
            title: record.title.clone(),
            url: record.url.clone(),
            published_at: record.published_at,
            score: None,
        }
    }

    pub fn scored(record: &Record, score: f64) -> Self {
        Self {
            score: Some(score),
            ..Self::unscored(record)
        }
    }
}

impl Serialize for RankedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("RankedResult", 3)?;
        s.serialize_field("url", &self.url)?;
        s.serialize_field("title", &self.title)?;
        s.serialize_field("date", &self.published_at.to_rfc3339())?;
        s.end()
    }
}

/// Summary of the corpus currently being served.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusStats {
    pub records: usize,
    pub dimension: Option<usize>,
    pub skipped_rows: usize,
    pub model: String,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

/// Parse a publication timestamp as found in harvested link data.
///
/// Accepts RFC 3339, RFC 2822 (mail `Date:` headers, with or without a
/// trailing `(UTC)` style comment), `YYYY-MM-DD HH:MM:SS[.fff]` and bare
/// `YYYY-MM-DD`. Zone-less forms are taken as UTC.
pub fn parse_published_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    let without_comment = match raw.rfind(" (") {
        Some(pos) if raw.ends_with(')') => &raw[..pos],
        _ => raw,
    };
    if let Ok(dt) = DateTime::parse_from_rfc2822(without_comment) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
