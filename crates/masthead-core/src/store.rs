//! Title repository backends.
//!
//! The registry owns the record set; the core only reads it at startup and
//! appends through the acceptance path. The documented on-disk schema is an
//! append-only JSONL file, one [`TitleRecord`] object per line:
//!
//! ```text
//! {"id":1,"title":"Hindustan Times","normalized_title":"hindustan times","canonical_title":"hindustantimes"}
//! ```

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{CoreError, TitleRecord};

/// Read access to the registered-title set.
pub trait TitleStore: Send + Sync {
    fn get_all_titles(&self) -> Result<Vec<TitleRecord>, CoreError>;
}

/// Append-only JSONL file store.
pub struct JsonlTitleStore {
    path: PathBuf,
}

impl JsonlTitleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist an accepted record by appending one line.
    pub fn append(&self, record: &TitleRecord) -> Result<(), CoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

impl TitleStore for JsonlTitleStore {
    fn get_all_titles(&self) -> Result<Vec<TitleRecord>, CoreError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            CoreError::Repository(format!(
                "cannot read title dataset {}: {e}",
                self.path.display()
            ))
        })?;

        let mut titles = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: TitleRecord = serde_json::from_str(line).map_err(|e| {
                CoreError::Repository(format!(
                    "{}:{}: malformed record: {e}",
                    self.path.display(),
                    line_no + 1
                ))
            })?;
            titles.push(record);
        }
        Ok(titles)
    }
}

/// In-memory store for tests and embedded datasets.
#[derive(Default)]
pub struct InMemoryTitleStore {
    titles: Vec<TitleRecord>,
}

impl InMemoryTitleStore {
    pub fn new(titles: Vec<TitleRecord>) -> Self {
        Self { titles }
    }
}

impl TitleStore for InMemoryTitleStore {
    fn get_all_titles(&self) -> Result<Vec<TitleRecord>, CoreError> {
        Ok(self.titles.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jsonl_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("titles.jsonl");
        let store = JsonlTitleStore::new(&path);

        std::fs::write(&path, "").unwrap();
        store.append(&TitleRecord::new(1, "Hindustan Times")).unwrap();
        store.append(&TitleRecord::new(2, "Dainik Jagran")).unwrap();

        let titles = store.get_all_titles().unwrap();
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[0].normalized_title, "hindustan times");
        assert_eq!(titles[1].canonical_title, "dainikjagran");
    }

    #[test]
    fn blank_lines_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("titles.jsonl");
        std::fs::write(
            &path,
            "{\"id\":1,\"title\":\"X Ray\",\"normalized_title\":\"x ray\",\"canonical_title\":\"xray\"}\n\n",
        )
        .unwrap();
        let titles = JsonlTitleStore::new(&path).get_all_titles().unwrap();
        assert_eq!(titles.len(), 1);
    }

    #[test]
    fn missing_file_is_repository_error() {
        let store = JsonlTitleStore::new("/nonexistent/titles.jsonl");
        assert!(matches!(
            store.get_all_titles(),
            Err(CoreError::Repository(_))
        ));
    }

    #[test]
    fn malformed_line_reports_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("titles.jsonl");
        std::fs::write(&path, "{broken\n").unwrap();
        let err = JsonlTitleStore::new(&path).get_all_titles().unwrap_err();
        assert!(err.to_string().contains(":1:"));
    }

    #[test]
    fn optional_embedding_deserializes() {
        let line = r#"{"id":7,"title":"T","normalized_title":"t","canonical_title":"t","embedding":[0.25,0.5]}"#;
        let record: TitleRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.embedding.as_deref(), Some(&[0.25, 0.5][..]));
    }
}
