// * Milenio adapter.
// *
// * The search page only renders results after the query is submitted
// * client-side, so discovery fills the search box and clicks submit before
// * reading the listing. The paginator is a plain link labelled SIGUIENTE,
// * located and activated through evaluated scripts because it carries no
// * distinguishing selector of its own.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::browser::{PageSession, RenderError};
use crate::config::constants::{
    MILENIO_PAGE_SIZE, NAVIGATION_TIMEOUT_MS, SEARCH_BOX_TIMEOUT_MS, SEARCH_NAV_TIMEOUT_MS,
    SEARCH_SETTLE_MS,
};
use crate::geo::EntityRecognizer;
use crate::model::{ArticleRecord, LinkBatch, NewsSource};
use crate::network::FetchClient;
use crate::sites::{
    compose_record, ExtractError, JsonLdArticle, PaginationPolicy, RawArticle, SiteAdapter,
};

use async_trait::async_trait;

const SEARCH_BOX: &str = r#"input[name="text"]"#;
const SUBMIT_BUTTON: &str = r#"button[type="submit"].secondary.rounded-soft"#;

// * Probe for the SIGUIENTE paginator link
const NEXT_PROBE_JS: &str = r#"
(() => {
    const buttons = Array.from(document.querySelectorAll('a.board-module__a'));
    const nextButton = buttons.find(el => {
        const span = el.querySelector('span.label');
        return span && span.textContent.trim() === 'SIGUIENTE';
    });
    return !!nextButton;
})()
"#;

// * Clicks the SIGUIENTE link, reports whether anything was clicked
const NEXT_CLICK_JS: &str = r#"
(() => {
    const buttons = Array.from(document.querySelectorAll('a.board-module__a'));
    const nextButton = buttons.find(el => {
        const span = el.querySelector('span.label');
        return span && span.textContent.trim() === 'SIGUIENTE';
    });
    if (nextButton) {
        nextButton.click();
        return true;
    }
    return false;
})()
"#;

static SEL_RESULT_COUNT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".search-controls__results__count").unwrap());
static SEL_LISTING_LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.board-module__a").unwrap());
static SEL_JSON_LD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());
static SEL_LOGORA: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.logora_synthese").unwrap());

// * The counter reads "Resultados en Milenio: <n>"
static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Milenio:\s*(\d+)").unwrap());

pub struct MilenioAdapter {
    base_url: String,
    client: Arc<FetchClient>,
    recognizer: Arc<dyn EntityRecognizer>,
    pagination: PaginationPolicy,
}

impl MilenioAdapter {
    pub fn new(client: Arc<FetchClient>, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self::with_pagination(
            client,
            recognizer,
            PaginationPolicy::Computed {
                page_size: MILENIO_PAGE_SIZE,
            },
        )
    }

    pub fn with_pagination(
        client: Arc<FetchClient>,
        recognizer: Arc<dyn EntityRecognizer>,
        pagination: PaginationPolicy,
    ) -> Self {
        Self {
            base_url: "https://www.milenio.com".to_string(),
            client,
            recognizer,
            pagination,
        }
    }

    async fn discover(&self, query: &str) -> Result<LinkBatch, RenderError> {
        let encoded = query.replace(' ', "+");
        let search_url = format!("{}/buscador?text={}", self.base_url, encoded);

        let session = PageSession::open(&search_url, SEARCH_NAV_TIMEOUT_MS).await?;
        let result = self.run_search(&session, &encoded).await;
        session.close().await;
        result
    }

    async fn run_search(
        &self,
        session: &PageSession,
        encoded_query: &str,
    ) -> Result<LinkBatch, RenderError> {
        // * Results only render after the search is submitted in-page
        session
            .wait_for_selector(SEARCH_BOX, SEARCH_BOX_TIMEOUT_MS)
            .await?;
        session
            .evaluate(&format!(
                "document.querySelector('input[name=\"text\"]').value = {encoded_query:?}"
            ))
            .await?;
        session.click(SUBMIT_BUTTON).await?;
        session.settle(SEARCH_SETTLE_MS).await;

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

            match session.evaluate_bool(NEXT_PROBE_JS).await {
                Ok(true) => {}
                Ok(false) => {
                    info!("next control absent, stopping pagination");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "next control probe failed, stopping pagination");
                    break;
                }
            }

            match session.evaluate_bool(NEXT_CLICK_JS).await {
                Ok(true) => {}
                Ok(false) => {
                    info!("next control not clickable, stopping pagination");
                    break;
                }
                Err(e) => {
                    warn!(error = %e, "next control click failed, stopping pagination");
                    break;
                }
            }

            if let Err(e) = session.wait_for_navigation(NAVIGATION_TIMEOUT_MS).await {
                warn!(error = %e, "navigation did not complete, stopping pagination");
                break;
            }

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
impl SiteAdapter for MilenioAdapter {
    fn source(&self) -> NewsSource {
        NewsSource::Milenio
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
    COUNT_RE
        .captures(text.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
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

    // * First decodable JSON-LD block carries the article fields
    let article = doc
        .select(&SEL_JSON_LD)
        .filter_map(|script| {
            let text: String = script.text().collect();
            match serde_json::from_str::<JsonLdArticle>(text.trim()) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    debug!(error = %e, "skipping undecodable JSON-LD block");
                    None
                }
            }
        })
        .next()
        .ok_or(ExtractError::MissingStructuredData("JSON-LD"))?;

    let headline = article.headline.unwrap_or_default();
    let subtitle = article.alternative_headline.unwrap_or_default();
    let description = article.description.unwrap_or_default();
    let body = article.article_body.unwrap_or_default();

    let full_text = format!("{headline}. {description}. {subtitle}. {body}")
        .trim()
        .to_string();

    let raw_date = article
        .date_published
        .ok_or(ExtractError::MissingStructuredData("datePublished"))?;

    let native_id = doc
        .select(&SEL_LOGORA)
        .next()
        .and_then(|el| el.value().attr("data-identifier"))
        .map(str::to_string);

    Ok(RawArticle {
        native_id,
        full_text,
        raw_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_html() -> &'static str {
        r#"
        <html>
        <head>
            <script type="application/ld+json">
            {
                "@type": "NewsArticle",
                "headline": "Operativo en Sinaloa",
                "alternativeHeadline": "Autoridades detienen a cinco",
                "description": "Un operativo estatal",
                "articleBody": "El operativo se realizó la madrugada del martes.",
                "datePublished": "2023-09-12T06:45:00Z"
            }
            </script>
        </head>
        <body>
            <div class="logora_synthese" data-identifier="1935755" data-object-id="logora_config"></div>
        </body>
        </html>
        "#
    }

    #[test]
    fn test_parse_article() {
        let raw = parse_article(article_html()).unwrap();
        assert_eq!(raw.native_id.as_deref(), Some("1935755"));
        assert_eq!(raw.raw_date, "2023-09-12T06:45:00Z");
        assert_eq!(
            raw.full_text,
            "Operativo en Sinaloa. Un operativo estatal. Autoridades detienen a cinco. \
             El operativo se realizó la madrugada del martes."
        );
    }

    #[test]
    fn test_parse_article_without_json_ld_fails() {
        let html = "<html><body><p>nada</p></body></html>";
        assert!(matches!(
            parse_article(html),
            Err(ExtractError::MissingStructuredData("JSON-LD"))
        ));
    }

    #[test]
    fn test_parse_article_without_date_fails() {
        let html = r#"<script type="application/ld+json">
            {"@type": "NewsArticle", "headline": "t"}
        </script>"#;
        assert!(matches!(
            parse_article(html),
            Err(ExtractError::MissingStructuredData("datePublished"))
        ));
    }

    #[test]
    fn test_parse_result_count_requires_site_prefix() {
        let html = r#"<span class="search-controls__results__count">
            Resultados en Milenio: 57</span>"#;
        assert_eq!(parse_result_count(html), Some(57));

        let other = r#"<span class="search-controls__results__count">57 resultados</span>"#;
        assert_eq!(parse_result_count(other), None);
    }

    #[test]
    fn test_parse_listing_links() {
        let html = r#"
            <a class="board-module__a" href="/policia/nota-1">n1</a>
            <a class="board-module__a" href="/politica/nota-2">n2</a>
            <a class="other" href="/no">no</a>
        "#;
        let links = parse_listing_links(html, "https://www.milenio.com");
        assert_eq!(
            links,
            vec![
                "https://www.milenio.com/policia/nota-1",
                "https://www.milenio.com/politica/nota-2",
            ]
        );
    }
}
