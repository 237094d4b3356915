// * Core data model: the canonical article record, its source tag, and the
// * deduplicated link batch produced by discovery.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Closed set of supported newspapers. Adding a site means adding a variant
/// here plus its adapter module under `sites/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NewsSource {
    #[serde(rename = "El universal")]
    ElUniversal,
    #[serde(rename = "La Jornada")]
    LaJornada,
    #[serde(rename = "Milenio")]
    Milenio,
}

impl NewsSource {
    /// Registry key used by the orchestrator and the CLI.
    pub fn key(&self) -> &'static str {
        match self {
            NewsSource::ElUniversal => "el_universal",
            NewsSource::LaJornada => "la_jornada",
            NewsSource::Milenio => "milenio",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "el_universal" => Some(NewsSource::ElUniversal),
            "la_jornada" => Some(NewsSource::LaJornada),
            "milenio" => Some(NewsSource::Milenio),
            _ => None,
        }
    }

    pub fn all() -> &'static [NewsSource] {
        &[
            NewsSource::ElUniversal,
            NewsSource::LaJornada,
            NewsSource::Milenio,
        ]
    }
}

impl fmt::Display for NewsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsSource::ElUniversal => write!(f, "El universal"),
            NewsSource::LaJornada => write!(f, "La Jornada"),
            NewsSource::Milenio => write!(f, "Milenio"),
        }
    }
}

/// Canonical output unit persisted to the corpus.
///
/// Serialized field names match the corpus artifact produced by earlier runs,
/// so existing corpora keep loading across versions. `id` is the country-code
/// prefix followed by the site-native content identifier; when a site omits
/// the native id the prefix stands alone, so ids are not globally unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(rename = "ID_noticia")]
    pub id: String,

    /// Stop-word-filtered frequency count of the composed article text.
    #[serde(rename = "token")]
    pub tokens: HashMap<String, u32>,

    /// Canonical `DD/MM/YYYY` form.
    #[serde(rename = "fecha")]
    pub published_date: String,

    #[serde(rename = "diario")]
    pub source: NewsSource,

    #[serde(rename = "país")]
    pub country: String,

    /// Canonical state/province name, absent when unresolved.
    #[serde(rename = "ubicación_noticia")]
    pub region: Option<String>,
}

/// Ordered, deduplicated sequence of article URLs discovered for one
/// (site, query) pair. Dedup is by exact string match within a single
/// discovery run, never across runs.
#[derive(Debug, Default, Clone)]
pub struct LinkBatch {
    urls: Vec<String>,
    seen: HashSet<String>,
}

impl LinkBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a URL unless the batch already holds it. Returns whether the
    /// URL was actually added.
    pub fn push(&mut self, url: String) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.urls.push(url);
        true
    }

    pub fn extend<I: IntoIterator<Item = String>>(&mut self, urls: I) {
        for url in urls {
            self.push(url);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.urls
    }
}

impl FromIterator<String> for LinkBatch {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut batch = LinkBatch::new();
        batch.extend(iter);
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_batch_dedups_exact_strings() {
        let mut batch = LinkBatch::new();
        assert!(batch.push("https://example.com/a".to_string()));
        assert!(batch.push("https://example.com/b".to_string()));
        assert!(!batch.push("https://example.com/a".to_string()));

        assert_eq!(batch.len(), 2);
        let urls: Vec<&str> = batch.iter().collect();
        assert_eq!(urls, vec!["https://example.com/a", "https://example.com/b"]);
    }

    #[test]
    fn test_link_batch_preserves_discovery_order() {
        let batch: LinkBatch = ["c", "a", "b", "a"]
            .iter()
            .map(|s| format!("https://example.com/{s}"))
            .collect();

        let urls: Vec<&str> = batch.iter().collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/c",
                "https://example.com/a",
                "https://example.com/b"
            ]
        );
    }

    #[test]
    fn test_source_key_round_trip() {
        for source in NewsSource::all() {
            assert_eq!(NewsSource::from_key(source.key()), Some(*source));
        }
        assert_eq!(NewsSource::from_key("reforma"), None);
    }

    #[test]
    fn test_record_serializes_corpus_field_names() {
        let record = ArticleRecord {
            id: "MEX1935755".to_string(),
            tokens: HashMap::from([("violencia".to_string(), 3)]),
            published_date: "24/04/2025".to_string(),
            source: NewsSource::Milenio,
            country: "México".to_string(),
            region: Some("Jalisco".to_string()),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"ID_noticia\":\"MEX1935755\""));
        assert!(json.contains("\"diario\":\"Milenio\""));
        assert!(json.contains("\"país\":\"México\""));
        assert!(json.contains("\"ubicación_noticia\":\"Jalisco\""));
        assert!(json.contains("\"fecha\":\"24/04/2025\""));
    }
}
