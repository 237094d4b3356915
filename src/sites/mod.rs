// * Per-site scraping contract and the shared normalization step that turns
// * raw extraction output into a canonical article record.
// *
// * One adapter per newspaper, a closed set: adding a site means adding a
// * module here and a `NewsSource` variant, never touching shared code.

pub mod el_universal;
pub mod la_jornada;
pub mod milenio;

pub use el_universal::ElUniversalAdapter;
pub use la_jornada::LaJornadaAdapter;
pub use milenio::MilenioAdapter;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use thiserror::Error;

use crate::config::constants::RETENTION_CUTOFF_YEAR;
use crate::geo::{resolve_locations, EntityRecognizer};
use crate::model::{ArticleRecord, LinkBatch, NewsSource};
use crate::network::NetworkError;
use crate::normalize::{
    country_code, normalize_date, parse_canonical_date, within_retention, word_count,
};

/// Extraction failures are recovered at the batch level by the orchestrator;
/// the offending article is dropped, never the whole run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("structured data block missing: {0}")]
    MissingStructuredData(&'static str),

    #[error("expected element missing: {0}")]
    MissingElement(&'static str),

    #[error("publish date unparseable: {0:?}")]
    UnparseableDate(String),
}

/// The polymorphic per-site scraping contract.
///
/// `discover_links` never fails: lower-level errors are caught, logged, and
/// degrade to an empty (or partial) batch. `extract_record` returns
/// `Ok(None)` for articles older than the retention cutoff and a real error
/// for pages that cannot be fetched or lack their mandatory structured data.
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    fn source(&self) -> NewsSource;

    async fn discover_links(&self, query: &str) -> LinkBatch;

    async fn extract_record(&self, url: &str)
        -> Result<Option<ArticleRecord>, ExtractError>;
}

/// Where a paginating adapter takes its page count from.
///
/// `Computed` divides the parsed result total by the site's listing page
/// size; `Fixed` pins the count regardless of the indicator, matching the
/// historical hard-capped variants of some adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationPolicy {
    Computed { page_size: usize },
    Fixed(usize),
}

impl PaginationPolicy {
    /// Number of listing pages to read, never less than one.
    pub fn page_count(&self, result_count: usize) -> usize {
        match self {
            PaginationPolicy::Computed { page_size } => {
                let pages = (result_count as f64 / *page_size as f64).round() as usize;
                pages.max(1)
            }
            PaginationPolicy::Fixed(pages) => (*pages).max(1),
        }
    }
}

// * First run of digits in a result-count indicator text
static FIRST_INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)").unwrap());

pub(crate) fn first_integer(text: &str) -> Option<usize> {
    FIRST_INTEGER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Partial JSON-LD article shape shared by the sites that embed
/// `application/ld+json` blocks. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct JsonLdArticle {
    #[serde(rename = "@type")]
    pub schema_type: Option<JsonLdType>,
    pub headline: Option<String>,
    #[serde(rename = "alternativeHeadline")]
    pub alternative_headline: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "articleBody")]
    pub article_body: Option<String>,
    #[serde(rename = "datePublished")]
    pub date_published: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum JsonLdType {
    Single(String),
    Array(Vec<String>),
}

impl JsonLdArticle {
    pub fn is_news_article(&self) -> bool {
        match &self.schema_type {
            Some(JsonLdType::Single(t)) => t == "NewsArticle",
            Some(JsonLdType::Array(types)) => types.iter().any(|t| t == "NewsArticle"),
            None => false,
        }
    }
}

/// Raw per-site extraction output, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawArticle {
    pub native_id: Option<String>,
    pub full_text: String,
    pub raw_date: String,
}

/// Shared tail of every extraction: location pass over the composed text,
/// country defaulting, tokenization, date canonicalization, and the
/// retention cutoff.
///
/// Returns `Ok(None)` when the resolved publish year predates the cutoff.
pub(crate) fn compose_record(
    source: NewsSource,
    native_id: Option<String>,
    full_text: &str,
    raw_date: &str,
    recognizer: &dyn EntityRecognizer,
) -> Result<Option<ArticleRecord>, ExtractError> {
    let locations = resolve_locations(recognizer, full_text);
    let country = locations
        .country
        .unwrap_or_else(|| "México".to_string());
    let code = country_code(&country);
    let tokens = word_count(full_text);

    let published_date = normalize_date(raw_date);
    let date = parse_canonical_date(&published_date)
        .ok_or_else(|| ExtractError::UnparseableDate(raw_date.to_string()))?;
    if !within_retention(&date, RETENTION_CUTOFF_YEAR) {
        return Ok(None);
    }

    Ok(Some(ArticleRecord {
        id: format!("{code}{}", native_id.unwrap_or_default()),
        tokens,
        published_date,
        source,
        country,
        region: locations.state,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::GazetteerRecognizer;

    #[test]
    fn test_page_count_computed() {
        let policy = PaginationPolicy::Computed { page_size: 20 };
        assert_eq!(policy.page_count(0), 1);
        assert_eq!(policy.page_count(7), 1);
        assert_eq!(policy.page_count(45), 2);
        assert_eq!(policy.page_count(200), 10);
    }

    #[test]
    fn test_page_count_fixed_ignores_result_total() {
        let policy = PaginationPolicy::Fixed(2);
        assert_eq!(policy.page_count(0), 2);
        assert_eq!(policy.page_count(10_000), 2);
    }

    #[test]
    fn test_first_integer() {
        assert_eq!(first_integer("Resultados: 143 notas"), Some(143));
        assert_eq!(first_integer("sin resultados"), None);
    }

    #[test]
    fn test_compose_record_keeps_recent_article() {
        let rec = GazetteerRecognizer::new();
        let record = compose_record(
            NewsSource::Milenio,
            Some("1935755".to_string()),
            "Feminicidio en Jalisco conmociona a la región",
            "2020-05-01T12:00:00Z",
            &rec,
        )
        .unwrap()
        .expect("record within retention window");

        assert_eq!(record.id, "MEX1935755");
        assert_eq!(record.published_date, "01/05/2020");
        assert_eq!(record.country, "México");
        assert_eq!(record.region.as_deref(), Some("Jalisco"));
        assert_eq!(record.tokens.get("feminicidio"), Some(&1));
    }

    #[test]
    fn test_compose_record_drops_pre_cutoff_article() {
        let rec = GazetteerRecognizer::new();
        let record = compose_record(
            NewsSource::LaJornada,
            Some("w-1".to_string()),
            "una nota antigua",
            "2015-12-31",
            &rec,
        )
        .unwrap();
        assert!(record.is_none());
    }

    #[test]
    fn test_compose_record_cutoff_boundary_kept() {
        let rec = GazetteerRecognizer::new();
        let record = compose_record(
            NewsSource::ElUniversal,
            None,
            "una nota de enero",
            "2016-01-01",
            &rec,
        )
        .unwrap();
        assert!(record.is_some());
    }

    #[test]
    fn test_compose_record_unparseable_date_is_an_error() {
        let rec = GazetteerRecognizer::new();
        let result = compose_record(
            NewsSource::Milenio,
            None,
            "texto",
            "hace dos horas",
            &rec,
        );
        assert!(matches!(result, Err(ExtractError::UnparseableDate(_))));
    }

    #[test]
    fn test_compose_record_defaults_country_to_mexico() {
        let rec = GazetteerRecognizer::new();
        let record = compose_record(
            NewsSource::Milenio,
            Some("9".to_string()),
            "una nota sin lugares reconocibles",
            "2021-03-03",
            &rec,
        )
        .unwrap()
        .unwrap();
        assert_eq!(record.country, "México");
        assert_eq!(record.id, "MEX9");
        assert_eq!(record.region, None);
    }

    #[test]
    fn test_compose_record_missing_native_id_keeps_prefix_only() {
        let rec = GazetteerRecognizer::new();
        let record = compose_record(
            NewsSource::ElUniversal,
            None,
            "nota en Texas",
            "2019-06-06",
            &rec,
        )
        .unwrap()
        .unwrap();
        assert_eq!(record.country, "Estados Unidos");
        assert_eq!(record.id, "EST");
    }
}
