// * El Universal adapter.
// *
// * Discovery drives the rendered search listing at /buscador/ and pages
// * through it with the "next" control. Extraction reads the site-global
// * `Fusion.globalContent` JSON assignment plus the `dataLayer.push` payload,
// * with paragraph-level DOM text as the article body.

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::Arc;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::browser::{PageSession, RenderError};
use crate::config::constants::{
    EL_UNIVERSAL_PAGE_SIZE, NEXT_CONTROL_TIMEOUT_MS, PAGE_SETTLE_MS, SEARCH_NAV_TIMEOUT_MS,
};
use crate::geo::EntityRecognizer;
use crate::model::{ArticleRecord, LinkBatch, NewsSource};
use crate::network::FetchClient;
use crate::sites::{
    compose_record, first_integer, ExtractError, PaginationPolicy, RawArticle, SiteAdapter,
};

use async_trait::async_trait;

const NEXT_CONTROL: &str = "a.next_btn";

static SEL_RESULT_COUNT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.result_count").unwrap());
static SEL_LISTING_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href][onmousedown]").unwrap());
static SEL_FUSION_SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script#fusion-metadata").unwrap());
static SEL_SCRIPTS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());
static SEL_BODY_PARAGRAPHS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"p.sc__font-paragraph[itemprop="description"]"#).unwrap()
});

static FUSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)Fusion\.globalContent\s*=\s*(\{.*?\})\s*;").unwrap());
static DATALAYER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)dataLayer\.push\((\{.*?\})\);").unwrap());

pub struct ElUniversalAdapter {
    base_url: String,
    client: Arc<FetchClient>,
    recognizer: Arc<dyn EntityRecognizer>,
    pagination: PaginationPolicy,
}

impl ElUniversalAdapter {
    pub fn new(client: Arc<FetchClient>, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self::with_pagination(
            client,
            recognizer,
            PaginationPolicy::Computed {
                page_size: EL_UNIVERSAL_PAGE_SIZE,
            },
        )
    }

    pub fn with_pagination(
        client: Arc<FetchClient>,
        recognizer: Arc<dyn EntityRecognizer>,
        pagination: PaginationPolicy,
    ) -> Self {
        Self {
            base_url: "https://www.eluniversal.com.mx".to_string(),
            client,
            recognizer,
            pagination,
        }
    }

    async fn discover(&self, query: &str) -> Result<LinkBatch, RenderError> {
        let encoded = query.replace(' ', "+");
        let search_url = format!("{}/buscador/?query={}", self.base_url, encoded);

        let session = PageSession::open(&search_url, SEARCH_NAV_TIMEOUT_MS).await?;
        let result = self.paginate(&session).await;
        session.close().await;
        result
    }

    async fn paginate(&self, session: &PageSession) -> Result<LinkBatch, RenderError> {
        let html = session.content().await?;

        let Some(count) = parse_result_count(&html) else {
            warn!("result count indicator missing or unparseable, nothing discovered");
            return Ok(LinkBatch::new());
        };

        let page_count = self.pagination.page_count(count);
        info!(results = count, pages = page_count, "search listing located");

        let mut batch = LinkBatch::new();
        debug!(page = 1, "reading listing page");
        batch.extend(parse_listing_links(&html, &self.base_url));

        for page in 1..page_count {
            debug!(page = page + 1, "reading listing page");

            if !session.exists(NEXT_CONTROL).await {
                info!("next control absent, stopping pagination");
                break;
            }
            match session.is_visible(NEXT_CONTROL).await {
                Ok(true) => {}
                Ok(false) => {
                    info!("next control hidden, stopping pagination");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "visibility check failed, stopping pagination");
                    break;
                }
            }

            if let Err(e) = session.click(NEXT_CONTROL).await {
                warn!(error = %e, "next control click failed, stopping pagination");
                break;
            }
            if let Err(e) = session
                .wait_for_selector(NEXT_CONTROL, NEXT_CONTROL_TIMEOUT_MS)
                .await
            {
                warn!(error = %e, "results marker did not reappear, stopping pagination");
                break;
            }
            session.settle(PAGE_SETTLE_MS).await;

            match session.content().await {
                Ok(html) => batch.extend(parse_listing_links(&html, &self.base_url)),
                Err(e) => {
                    warn!(error = %e, "listing page read failed, stopping pagination");
                    break;
                }
            }
        }

        Ok(batch)
    }
}

#[async_trait]
impl SiteAdapter for ElUniversalAdapter {
    fn source(&self) -> NewsSource {
        NewsSource::ElUniversal
    }

    async fn discover_links(&self, query: &str) -> LinkBatch {
        match self.discover(query).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!(error = %e, site = %self.source(), "link discovery failed, returning empty batch");
                LinkBatch::new()
            }
        }
    }

    async fn extract_record(
        &self,
        url: &str,
    ) -> Result<Option<ArticleRecord>, ExtractError> {
        let html = self.client.fetch(url).await?;
        let raw = parse_article(&html)?;
        compose_record(
            self.source(),
            raw.native_id,
            &raw.full_text,
            &raw.raw_date,
            self.recognizer.as_ref(),
        )
    }
}

fn parse_result_count(html: &str) -> Option<usize> {
    let doc = Html::parse_document(html);
    let node = doc.select(&SEL_RESULT_COUNT).next()?;
    let text: String = node.text().collect();
    first_integer(&text)
}

fn parse_listing_links(html: &str, base_url: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    doc.select(&SEL_LISTING_LINKS)
        .filter_map(|el| el.value().attr("href"))
        .map(|href| format!("{base_url}{href}"))
        .collect()
}

fn parse_article(html: &str) -> Result<RawArticle, ExtractError> {
    let doc = Html::parse_document(html);

    // * Site-global content JSON; an absent or malformed block degrades to an
    // * empty object, the mandatory fields are checked below
    let fusion: Value = doc
        .select(&SEL_FUSION_SCRIPT)
        .next()
        .map(|node| node.text().collect::<String>())
        .and_then(|text| {
            FUSION_RE
                .captures(&text)
                .map(|caps| caps[1].to_string())
        })
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_else(|| Value::Object(Default::default()));

    let datalayer_text = doc
        .select(&SEL_SCRIPTS)
        .map(|node| node.text().collect::<String>())
        .find(|text| text.contains("dataLayer.push({"))
        .ok_or(ExtractError::MissingStructuredData("dataLayer script"))?;
    let caps = DATALAYER_RE
        .captures(&datalayer_text)
        .ok_or(ExtractError::MissingStructuredData("dataLayer payload"))?;
    let payload: Value = serde_json::from_str(&caps[1])
        .map_err(|_| ExtractError::MissingStructuredData("dataLayer payload"))?;

    let titulo = payload
        .get("titulo")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let descripcion = payload
        .get("descripcion")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let body = doc
        .select(&SEL_BODY_PARAGRAPHS)
        .map(|p| {
            p.text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join(" ");

    let full_text = format!("{titulo}. {descripcion}. {body}").trim().to_string();

    // * display_date is the date shown on the publication, as opposed to
    // * created_date which tracks edits
    let raw_date = fusion
        .get("display_date")
        .and_then(Value::as_str)
        .ok_or(ExtractError::MissingStructuredData("display_date"))?
        .to_string();

    let native_id = fusion
        .get("content_elements")
        .and_then(|v| v.get(0))
        .and_then(|v| v.get("_id"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(RawArticle {
        native_id,
        full_text,
        raw_date,
    })
}
