// * Headless browser session for JavaScript-rendered search listings.
// * One session per discovery call: launched, driven, and closed within the
// * call, on every exit path. All waits are bounded by explicit timeouts.

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use chromiumoxide::page::Page;

use crate::config::constants::SELECTOR_POLL_MS;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("page navigation failed: {0}")]
    Navigation(String),

    #[error("timeout after {0}ms waiting for {1}")]
    Timeout(u64, &'static str),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("content read failed: {0}")]
    ContentRead(String),

    #[error("element not found: {0}")]
    ElementNotFound(String),
}

/// A scoped rendered-page session.
///
/// `open` launches the browser and navigates; `close` tears everything down.
/// Dropping the session without closing still aborts the event handler task,
/// so a failed discovery never leaks a browser process wait loop.
pub struct PageSession {
    browser: Browser,
    handler: Option<tokio::task::JoinHandle<()>>,
    page: Page,
}

impl PageSession {
    /// Launches a headless browser and navigates to `url`, bounded by
    /// `nav_timeout_ms`.
    pub async fn open(url: &str, nav_timeout_ms: u64) -> Result<Self, RenderError> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .build()
            .map_err(RenderError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| RenderError::Launch(e.to_string()))?;

        // * Drain browser events in the background for the session lifetime
        let handle = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| RenderError::Navigation(e.to_string()))?;

        let mut session = Self {
            browser,
            handler: Some(handle),
            page,
        };

        if let Err(e) = session.navigate(url, nav_timeout_ms).await {
            session.close().await;
            return Err(e);
        }

        debug!(url, "rendered page session opened");
        Ok(session)
    }

    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<(), RenderError> {
        let timeout = Duration::from_millis(timeout_ms);
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(RenderError::Navigation(e.to_string())),
            Err(_) => Err(RenderError::Timeout(timeout_ms, "navigation")),
        }
    }

    /// Reads the full rendered markup of the current page.
    pub async fn content(&self) -> Result<String, RenderError> {
        self.page
            .content()
            .await
            .map_err(|e| RenderError::ContentRead(e.to_string()))
    }

    /// Whether an element matching `selector` is currently attached.
    pub async fn exists(&self, selector: &str) -> bool {
        self.page.find_element(selector).await.is_ok()
    }

    /// Visibility predicate: attached and taking part in layout.
    pub async fn is_visible(&self, selector: &str) -> Result<bool, RenderError> {
        let script = format!(
            "(() => {{ const el = document.querySelector({selector:?}); \
             return !!el && el.offsetParent !== null; }})()"
        );
        self.evaluate_bool(&script).await
    }

    /// Dispatches a click on the first element matching `selector`.
    pub async fn click(&self, selector: &str) -> Result<(), RenderError> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| RenderError::ElementNotFound(selector.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| RenderError::Script(e.to_string()))?;
        Ok(())
    }

    /// Evaluates a script expected to produce a boolean.
    pub async fn evaluate_bool(&self, script: &str) -> Result<bool, RenderError> {
        let result = self
            .page
            .evaluate(script.to_string())
            .await
            .map_err(|e| RenderError::Script(e.to_string()))?;
        result
            .into_value::<bool>()
            .map_err(|e| RenderError::Script(e.to_string()))
    }

    /// Evaluates a script for its side effects.
    pub async fn evaluate(&self, script: &str) -> Result<(), RenderError> {
        self.page
            .evaluate(script.to_string())
            .await
            .map_err(|e| RenderError::Script(e.to_string()))?;
        Ok(())
    }

    /// Polls until `selector` is attached, bounded by `timeout_ms`.
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout_ms: u64,
    ) -> Result<(), RenderError> {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.exists(selector).await {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(RenderError::Timeout(timeout_ms, "selector"));
            }
            tokio::time::sleep(Duration::from_millis(SELECTOR_POLL_MS)).await;
        }
    }

    /// Waits for the next navigation event, bounded by `timeout_ms`.
    pub async fn wait_for_navigation(&self, timeout_ms: u64) -> Result<(), RenderError> {
        let timeout = Duration::from_millis(timeout_ms);
        match tokio::time::timeout(timeout, self.page.wait_for_navigation()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(RenderError::Navigation(e.to_string())),
            Err(_) => Err(RenderError::Timeout(timeout_ms, "navigation event")),
        }
    }

    /// Fixed settle delay after an interaction. The rendering engine's DOM
    /// mutation is not otherwise observable as complete.
    pub async fn settle(&self, ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    /// Closes the page and browser gracefully.
    pub async fn close(mut self) {
        let _ = self.page.clone().close().await;
        let _ = self.browser.close().await;
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        info!("rendered page session closed");
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        // * Best effort, cannot await in drop
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
    }
}
