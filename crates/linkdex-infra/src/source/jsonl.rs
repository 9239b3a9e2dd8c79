//! JSON-lines corpus source.
//!
//! One JSON object per line, as written by the link harvester. Blank lines
//! are ignored; a line that is not JSON at all is a load error naming the
//! line number. A line that is JSON but does not fit the row shape (a
//! numeric date, a `null` inside the embedding) becomes an undecodable row,
//! so it goes through the malformed-row policy like any other bad row.

use std::path::{Path, PathBuf};

use linkdex_core::corpus::CorpusSource;
use linkdex_types::error::LoadError;
use linkdex_types::record::RawRow;

pub struct JsonlCorpusSource {
    path: PathBuf,
}

impl JsonlCorpusSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CorpusSource for JsonlCorpusSource {
    async fn read_rows(&self) -> Result<Vec<RawRow>, LoadError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            LoadError::Source(format!("failed to read {}: {e}", self.path.display()))
        })?;

        parse_lines(&content).map_err(|(line, e)| {
            LoadError::Source(format!("{}:{line}: invalid JSON: {e}", self.path.display()))
        })
    }

    fn describe(&self) -> String {
        format!("jsonl:{}", self.path.display())
    }
}

fn parse_lines(content: &str) -> Result<Vec<RawRow>, (usize, serde_json::Error)> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            let value: serde_json::Value = serde_json::from_str(line).map_err(|e| (i + 1, e))?;
            Ok(serde_json::from_value::<RawRow>(value)
                .unwrap_or_else(|e| RawRow::undecodable(format!("line {}: {e}", i + 1))))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkdex_core::corpus::{Corpus, LoadOptions};
    use linkdex_types::config::MalformedRowPolicy;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reads_rows_in_file_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.jsonl");
        tokio::fs::write(
            &path,
            concat!(
                r#"{"title": "A", "url": "u1", "date": "2024-01-01", "embedding": [1.0, 0.0]}"#,
                "\n\n",
                r#"{"subject": "B", "link": "u2", "date": "Mon, 1 Jan 2024 10:00:00 +0000", "embeddings": [0.0, 1.0]}"#,
                "\n",
            ),
        )
        .await
        .unwrap();

        let source = JsonlCorpusSource::new(&path);
        let rows = source.read_rows().await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title.as_deref(), Some("A"));
        assert_eq!(rows[1].url.as_deref(), Some("u2"));
        assert_eq!(rows[1].embedding, Some(vec![0.0, 1.0]));
        assert!(source.describe().starts_with("jsonl:"));
    }

    #[tokio::test]
    async fn test_invalid_line_reports_line_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.jsonl");
        tokio::fs::write(&path, "{\"url\": \"u1\"}\nnot json\n").await.unwrap();

        let err = JsonlCorpusSource::new(&path).read_rows().await.unwrap_err();
        match err {
            LoadError::Source(msg) => assert!(msg.contains(":2:"), "got {msg}"),
            other => panic!("expected Source error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_a_source_error() {
        let dir = tempdir().unwrap();
        let err = JsonlCorpusSource::new(dir.path().join("missing.jsonl"))
            .read_rows()
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Source(_)));
    }

    #[tokio::test]
    async fn test_wrong_typed_fields_follow_skip_policy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("links.jsonl");
        tokio::fs::write(
            &path,
            concat!(
                r#"{"title": "A", "url": "u1", "date": "2024-01-01", "embedding": [1.0, 0.0]}"#,
                "\n",
                r#"{"title": "B", "url": "u2", "date": 1704067200, "embedding": [0.0, 1.0]}"#,
                "\n",
                r#"{"title": "C", "url": "u3", "date": "2024-01-03", "embedding": [1.0, null]}"#,
                "\n",
            ),
        )
        .await
        .unwrap();

        let source = JsonlCorpusSource::new(&path);
        let rows = source.read_rows().await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].parse_error, None);
        assert!(rows[1].parse_error.as_deref().unwrap().starts_with("line 2:"));
        assert!(rows[2].parse_error.as_deref().unwrap().starts_with("line 3:"));

        let options = LoadOptions {
            expected_dimension: None,
            on_malformed: MalformedRowPolicy::Skip,
        };
        let corpus = Corpus::from_source(&source, options).await.unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.report().skipped, vec![1, 2]);

        let err = Corpus::from_source(&source, LoadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::MalformedRow { index: 1, .. }));
    }

    #[test]
    fn test_rows_without_fields_still_parse() {
        let rows = parse_lines("{}\n{\"title\": \"only title\"}\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], RawRow::default());
    }
}
