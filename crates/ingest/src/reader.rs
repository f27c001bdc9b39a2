use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::LookupError;

pub struct FileReader;

impl FileReader {
    pub async fn read_file(path: &Path, what: &'static str) -> Result<String> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|source| LookupError::Unavailable {
                what,
                path: path.to_path_buf(),
                source,
            })?;
        Ok(content)
    }

    /// Read a JSON array or a JSON Lines file of records.
    ///
    /// Records that fail to deserialize are logged and skipped; a file that is
    /// not JSON at all is an error.
    pub async fn read_records<T: DeserializeOwned>(path: &Path, what: &'static str) -> Result<Vec<T>> {
        let content = Self::read_file(path, what).await?;

        let values: Vec<serde_json::Value> = match extension(path).as_str() {
            "json" => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {} as a JSON array: {:?}", what, path))?,
            "jsonl" | "ndjson" => {
                let mut values = Vec::new();
                for (line_no, line) in content.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str(line) {
                        Ok(value) => values.push(value),
                        Err(e) => warn!(what, line = line_no + 1, error = %e, "Skipping malformed line"),
                    }
                }
                values
            }
            other => {
                return Err(LookupError::UnsupportedFormat {
                    what,
                    extension: other.to_string(),
                }
                .into());
            }
        };

        let total = values.len();
        let records: Vec<T> = values
            .into_iter()
            .enumerate()
            .filter_map(|(idx, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(what, index = idx, error = %e, "Skipping undecodable record");
                    None
                }
            })
            .collect();

        debug!(what, read = records.len(), skipped = total - records.len(), "Read records");
        Ok(records)
    }

    /// Read a list of strings: one per line for `.txt`, or a JSON array of strings.
    pub async fn read_lines(path: &Path, what: &'static str) -> Result<Vec<String>> {
        match extension(path).as_str() {
            "txt" => {
                let content = Self::read_file(path, what).await?;
                Ok(content
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect())
            }
            "json" | "jsonl" | "ndjson" => Self::read_records(path, what).await,
            other => Err(LookupError::UnsupportedFormat {
                what,
                extension: other.to_string(),
            }
            .into()),
        }
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::InscriptionRecord;

    #[tokio::test]
    async fn test_jsonl_skips_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("insc.jsonl");
        std::fs::write(
            &path,
            "{\"edcs_id\": \"A\", \"text\": \"D M\"}\nnot json\n\n{\"text\": \"no id\"}\n{\"edcs_id\": \"B\"}\n",
        )
        .unwrap();

        let records: Vec<InscriptionRecord> =
            FileReader::read_records(&path, "inscriptions").await.unwrap();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_lookup_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileReader::read_lines(&dir.path().join("names.txt"), "name authority")
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<LookupError>().is_some());
        assert!(err.to_string().contains("name authority unavailable"));
    }

    #[tokio::test]
    async fn test_lines_from_txt_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("names.txt");
        std::fs::write(&txt, "Aurelia\n\n  Marcus \n").unwrap();
        assert_eq!(
            FileReader::read_lines(&txt, "names").await.unwrap(),
            vec!["Aurelia", "Marcus"]
        );

        let json = dir.path().join("names.json");
        std::fs::write(&json, r#"["Iulia", "Titus"]"#).unwrap();
        assert_eq!(
            FileReader::read_lines(&json, "names").await.unwrap(),
            vec!["Iulia", "Titus"]
        );
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gazetteer.csv");
        std::fs::write(&path, "pid,name").unwrap();
        let err = FileReader::read_records::<serde_json::Value>(&path, "gazetteer")
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LookupError>(),
            Some(LookupError::UnsupportedFormat { .. })
        ));
    }
}
