// * Persisted corpus: a single pretty-printed UTF-8 JSON array of article
// * records, accumulated across runs. The store owns the file; merge is a
// * read-then-rewrite with a single-writer assumption, no cross-run dedup.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::ArticleRecord;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("corpus write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("corpus serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub struct CorpusStore {
    path: PathBuf,
}

impl CorpusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the accumulated corpus. A missing, empty, or undecodable file is
    /// treated as an empty base corpus, never an error.
    pub fn load(&self) -> Vec<ArticleRecord> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no existing corpus, starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corpus unreadable, starting empty");
                return Vec::new();
            }
        };

        if raw.trim().is_empty() {
            return Vec::new();
        }

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corpus undecodable, starting empty");
                Vec::new()
            }
        }
    }

    /// Appends `new_records` to the persisted corpus and rewrites it
    /// wholesale, returning the merged sequence. Existing records keep their
    /// order, new records follow in discovery order.
    ///
    /// The rewrite is not atomic; concurrent writers are unsupported and may
    /// lose updates.
    pub fn merge(
        &self,
        new_records: Vec<ArticleRecord>,
    ) -> Result<Vec<ArticleRecord>, CorpusError> {
        let mut merged = self.load();
        merged.extend(new_records);

        // * Pretty-printed, non-ASCII characters preserved literally
        let json = serde_json::to_string_pretty(&merged)?;
        fs::write(&self.path, json)?;

        debug!(path = %self.path.display(), total = merged.len(), "corpus rewritten");
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewsSource;
    use std::collections::HashMap;

    fn record(id: &str) -> ArticleRecord {
        ArticleRecord {
            id: id.to_string(),
            tokens: HashMap::from([("violencia".to_string(), 2)]),
            published_date: "01/02/2021".to_string(),
            source: NewsSource::LaJornada,
            country: "México".to_string(),
            region: None,
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorpusStore::new(dir.path().join("articles.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_empty_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        fs::write(&path, "  \n").unwrap();
        assert!(CorpusStore::new(path).load().is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        fs::write(&path, "{ not json ]").unwrap();
        assert!(CorpusStore::new(path).load().is_empty());
    }

    #[test]
    fn test_merge_appends_in_order_without_dedup() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorpusStore::new(dir.path().join("articles.json"));

        let first = store.merge(vec![record("MEX1"), record("MEX2")]).unwrap();
        assert_eq!(first.len(), 2);

        // * Same ids again: no cross-run dedup, strictly M+P
        let second = store.merge(vec![record("MEX2"), record("MEX3")]).unwrap();
        assert_eq!(second.len(), 4);
        let ids: Vec<&str> = second.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["MEX1", "MEX2", "MEX2", "MEX3"]);

        let reloaded = store.load();
        assert_eq!(reloaded.len(), 4);
    }

    #[test]
    fn test_written_artifact_preserves_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let store = CorpusStore::new(dir.path().join("articles.json"));
        store.merge(vec![record("MEX9")]).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("México"));
        assert!(raw.contains("ubicación_noticia"));
        assert!(!raw.contains("\\u00e9"));
    }

    #[test]
    fn test_merge_onto_corrupt_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        fs::write(&path, "garbage").unwrap();

        let store = CorpusStore::new(path);
        let merged = store.merge(vec![record("MEX1")]).unwrap();
        assert_eq!(merged.len(), 1);
    }
}
