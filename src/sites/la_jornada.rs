// * La Jornada adapter.
// *
// * The search listing renders in a single page, so discovery has no
// * pagination. Extraction reads the JSON-LD NewsArticle block for the
// * headline and summary, the nitf container for the body, and the DOM
// * byline area for the display date.

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::Arc;
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

use crate::browser::{PageSession, RenderError};
use crate::config::constants::SEARCH_NAV_TIMEOUT_MS;
use crate::geo::EntityRecognizer;
use crate::model::{ArticleRecord, LinkBatch, NewsSource};
use crate::network::FetchClient;
use crate::sites::{compose_record, ExtractError, JsonLdArticle, RawArticle, SiteAdapter};

use async_trait::async_trait;

static SEL_LISTING_LINKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div#middle.contenedor.contenedor-buscador div.fila a[href]").unwrap()
});
static SEL_JSON_LD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());
static SEL_ARTICLE_DATE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        "div#middle.contenedor.contenedor-detalle.contenedor-article span.nota-fecha",
    )
    .unwrap()
});
static SEL_BODY_PARAGRAPHS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#content_nitf p").unwrap());
static SEL_WIDGET_ID: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div[data-widget-id]").unwrap());

// * JSON-LD blocks on the site carry raw control characters inside string
// * literals; they must go before the payload parses as JSON
static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x1F\x7F]").unwrap());

pub struct LaJornadaAdapter {
    base_url: String,
    client: Arc<FetchClient>,
    recognizer: Arc<dyn EntityRecognizer>,
}

impl LaJornadaAdapter {
    pub fn new(client: Arc<FetchClient>, recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            base_url: "https://www.jornada.com.mx".to_string(),
            client,
            recognizer,
        }
    }

    async fn discover(&self, query: &str) -> Result<LinkBatch, RenderError> {
        let encoded = query.replace(' ', "%20");
        // * Cache-busting timestamp, the search endpoint serves stale
        // * listings without it
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let search_url = format!("{}/search/{}?time={}", self.base_url, encoded, timestamp);

        let session = PageSession::open(&search_url, SEARCH_NAV_TIMEOUT_MS).await?;
        let result = session.content().await;
        session.close().await;

        let html = result?;
        let batch = parse_search_links(&html);
        debug!(links = batch.len(), "search listing read");
        Ok(batch)
    }
}

#[async_trait]
impl SiteAdapter for LaJornadaAdapter {
    fn source(&self) -> NewsSource {
        NewsSource::LaJornada
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

fn parse_search_links(html: &str) -> LinkBatch {
    let doc = Html::parse_document(html);
    let mut batch = LinkBatch::new();
    for el in doc.select(&SEL_LISTING_LINKS) {
        if let Some(href) = el.value().attr("href") {
            if href.starts_with("https://") {
                batch.push(href.to_string());
            }
        }
    }
    batch
}

fn parse_article(html: &str) -> Result<RawArticle, ExtractError> {
    let doc = Html::parse_document(html);

    let article = news_article_block(&doc)
        .ok_or(ExtractError::MissingStructuredData("NewsArticle JSON-LD"))?;
    let headline = article.headline.unwrap_or_default();
    let description = article.description.unwrap_or_default();

    let raw_date = doc
        .select(&SEL_ARTICLE_DATE)
        .next()
        .map(|node| node.text().collect::<String>().trim().to_string())
        .ok_or(ExtractError::MissingElement("span.nota-fecha"))?;

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

    let full_text = format!("{headline}. {description}. {body}")
        .trim()
        .to_string();

    let native_id = doc
        .select(&SEL_WIDGET_ID)
        .next()
        .and_then(|el| el.value().attr("data-widget-id"))
        .map(str::to_string);

    Ok(RawArticle {
        native_id,
        full_text,
        raw_date,
    })
}

// * First JSON-LD block that is (or contains) a NewsArticle object
fn news_article_block(doc: &Html) -> Option<JsonLdArticle> {
    for script in doc.select(&SEL_JSON_LD) {
        let text: String = script.text().collect();
        let cleaned = CONTROL_CHARS.replace_all(&text, "");

        let value: Value = match serde_json::from_str(&cleaned) {
            Ok(v) => v,
            Err(e) => {
                debug!(error = %e, "skipping undecodable JSON-LD block");
                continue;
            }
        };

        let candidates: Vec<Value> = match value {
            Value::Array(items) => items,
            other => vec![other],
        };
        for candidate in candidates {
            if let Ok(article) = serde_json::from_value::<JsonLdArticle>(candidate) {
                if article.is_news_article() {
                    return Some(article);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article_html() -> &'static str {
        "<html><head>\
            <script type=\"application/ld+json\">\
            [{\"@type\": \"Organization\", \"name\": \"DEMOS\"},\
             {\"@type\": \"NewsArticle\",\
              \"headline\": \"Marchan en Veracruz\",\
              \"description\": \"Colectivos exigen justicia\"}]\
            </script>\
        </head><body>\
            <div id=\"middle\" class=\"contenedor contenedor-detalle contenedor-article\">\
                <span class=\"nota-fecha\">24 de abril de 2025 17:15</span>\
            </div>\
            <div id=\"content_nitf\">\
                <p>Primer párrafo.</p>\
                <p>Segundo párrafo.</p>\
            </div>\
            <div data-widget-id=\"w-778899\"></div>\
        </body></html>"
    }

    #[test]
    fn test_parse_article() {
        let raw = parse_article(article_html()).unwrap();
        assert_eq!(raw.native_id.as_deref(), Some("w-778899"));
        assert_eq!(raw.raw_date, "24 de abril de 2025 17:15");
        assert!(raw.full_text.starts_with("Marchan en Veracruz. "));
        assert!(raw.full_text.contains("Colectivos exigen justicia"));
        assert!(raw.full_text.contains("Primer párrafo. Segundo párrafo."));
    }

    #[test]
    fn test_parse_article_cleans_control_characters() {
        let html = "<html><head>\
            <script type=\"application/ld+json\">\
            {\"@type\": \"NewsArticle\", \"headline\": \"Linea\u{000b}partida\"}\
            </script>\
        </head><body>\
            <div id=\"middle\" class=\"contenedor contenedor-detalle contenedor-article\">\
                <span class=\"nota-fecha\">2024-01-01</span>\
            </div>\
        </body></html>";
        let raw = parse_article(html).unwrap();
        assert!(raw.full_text.starts_with("Lineapartida."));
    }

    #[test]
    fn test_parse_article_without_news_article_block_fails() {
        let html = "<html><body>\
            <div id=\"middle\" class=\"contenedor contenedor-detalle contenedor-article\">\
                <span class=\"nota-fecha\">2024-01-01</span>\
            </div>\
        </body></html>";
        assert!(matches!(
            parse_article(html),
            Err(ExtractError::MissingStructuredData("NewsArticle JSON-LD"))
        ));
    }

    #[test]
    fn test_parse_article_without_date_span_fails() {
        let html = "<html><head>\
            <script type=\"application/ld+json\">\
            {\"@type\": \"NewsArticle\", \"headline\": \"t\"}\
            </script>\
        </head><body></body></html>";
        assert!(matches!(
            parse_article(html),
            Err(ExtractError::MissingElement("span.nota-fecha"))
        ));
    }

    #[test]
    fn test_parse_search_links_filters_and_dedups() {
        let html = "<div id=\"middle\" class=\"contenedor contenedor-buscador\">\
            <div class=\"fila\"><a href=\"https://www.jornada.com.mx/n/1\">uno</a></div>\
            <div class=\"fila\"><a href=\"/relativa/2\">dos</a></div>\
            <div class=\"fila\"><a href=\"https://www.jornada.com.mx/n/1\">uno otra vez</a></div>\
            <div class=\"fila\"><a href=\"https://www.jornada.com.mx/n/3\">tres</a></div>\
        </div>";
        let batch = parse_search_links(html);
        let urls: Vec<&str> = batch.iter().collect();
        assert_eq!(
            urls,
            vec![
                "https://www.jornada.com.mx/n/1",
                "https://www.jornada.com.mx/n/3",
            ]
        );
    }
}
