// * Scraper registry and drive loop: maps a site key to its adapter, runs
// * discovery then per-article extraction for a query, and folds the
// * surviving records into the persisted corpus.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::corpus::{CorpusError, CorpusStore};
use crate::geo::{EntityRecognizer, GazetteerRecognizer};
use crate::model::ArticleRecord;
use crate::network::{FetchClient, NetworkError};
use crate::sites::{ElUniversalAdapter, LaJornadaAdapter, MilenioAdapter, SiteAdapter};

#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// A configuration mistake, surfaced to the invoker rather than
    /// swallowed like the transient per-article conditions.
    #[error("no adapter registered for site key {0:?}")]
    UnknownSite(String),

    #[error(transparent)]
    Corpus(#[from] CorpusError),
}

pub struct ScraperRegistry {
    adapters: HashMap<&'static str, Box<dyn SiteAdapter>>,
    store: CorpusStore,
}

impl ScraperRegistry {
    /// An empty registry over the given store; adapters are added with
    /// [`register`](Self::register).
    pub fn new(store: CorpusStore) -> Self {
        Self {
            adapters: HashMap::new(),
            store,
        }
    }

    /// Registry with every supported newspaper registered, sharing one fetch
    /// client and the built-in gazetteer recognizer.
    pub fn with_default_sites(store: CorpusStore) -> Result<Self, NetworkError> {
        let client = Arc::new(FetchClient::new()?);
        let recognizer: Arc<dyn EntityRecognizer> = Arc::new(GazetteerRecognizer::new());

        let mut registry = Self::new(store);
        registry.register(Box::new(ElUniversalAdapter::new(
            client.clone(),
            recognizer.clone(),
        )));
        registry.register(Box::new(LaJornadaAdapter::new(
            client.clone(),
            recognizer.clone(),
        )));
        registry.register(Box::new(MilenioAdapter::new(client, recognizer)));
        Ok(registry)
    }

    pub fn register(&mut self, adapter: Box<dyn SiteAdapter>) {
        self.adapters.insert(adapter.source().key(), adapter);
    }

    pub fn site_keys(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = self.adapters.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Runs discovery and extraction for one (site, query) pair and merges
    /// the new records into the corpus, returning the full merged sequence.
    ///
    /// A per-article extraction failure drops that article only; an unknown
    /// site key or a corpus write failure aborts the call.
    pub async fn scrape(
        &self,
        site_key: &str,
        query: &str,
    ) -> Result<Vec<ArticleRecord>, OrchestratorError> {
        let adapter = self
            .adapters
            .get(site_key)
            .ok_or_else(|| OrchestratorError::UnknownSite(site_key.to_string()))?;

        info!(site = site_key, query, "scrape started");
        let batch = adapter.discover_links(query).await;

        let mut fresh = Vec::new();
        for url in batch.iter() {
            match adapter.extract_record(url).await {
                Ok(Some(record)) => fresh.push(record),
                Ok(None) => {
                    debug!(%url, "article predates retention cutoff, skipped");
                }
                Err(e) => {
                    warn!(%url, error = %e, "article extraction failed, dropped");
                }
            }
        }

        info!(
            site = site_key,
            query,
            discovered = batch.len(),
            kept = fresh.len(),
            "scrape finished"
        );

        let merged = self.store.merge(fresh)?;
        Ok(merged)
    }
}
