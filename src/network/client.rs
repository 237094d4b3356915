use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;

use crate::network::errors::NetworkError;

// * Desktop Chrome identity presented to the article endpoints. The search
// * listings are fetched through the rendering engine instead; this client
// * only performs the plain HTTP article fetches.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36 Edg/134.0.0.0";

const ACCEPT_VALUE: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

// * Mexican-Spanish locale chain the newspapers expect.
const ACCEPT_LANGUAGE_VALUE: &str =
    "es-419,es;q=0.9,es-ES;q=0.8,en;q=0.7,en-GB;q=0.6,en-US;q=0.5,es-MX;q=0.4";

/// HTTP engine for non-rendered article fetches.
pub struct FetchClient {
    inner: Client,
}

impl FetchClient {
    pub fn new() -> Result<Self, NetworkError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE),
        );

        let inner = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { inner })
    }

    /// Fetches a URL and returns the response body, validating status and
    /// non-emptiness.
    pub async fn fetch(&self, url: &str) -> Result<String, NetworkError> {
        let resp = self.inner.get(url).send().await?;
        let status = resp.status();

        if !status.is_success() {
            return Err(NetworkError::Status(status.as_u16()));
        }

        let body = resp.text().await?;
        if body.is_empty() {
            return Err(NetworkError::EmptyResponse);
        }

        Ok(body)
    }
}
