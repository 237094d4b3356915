//! Search-driven article harvester for Mexican newspapers.
//!
//! For each (site, search term) pair the pipeline discovers article URLs
//! from the site's rendered search listing, extracts a structured record per
//! article (embedded JSON first, DOM fallback), normalizes dates and
//! locations, tokenizes the text, and appends the surviving records to a
//! persisted JSON corpus for later textual analysis.

pub mod browser;
pub mod config;
pub mod corpus;
pub mod geo;
pub mod model;
pub mod network;
pub mod normalize;
pub mod orchestrator;
pub mod sites;
pub mod terms;

pub use corpus::{CorpusError, CorpusStore};
pub use model::{ArticleRecord, LinkBatch, NewsSource};
pub use orchestrator::{OrchestratorError, ScraperRegistry};
pub use sites::{ExtractError, PaginationPolicy, SiteAdapter};
