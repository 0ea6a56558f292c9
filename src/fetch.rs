//! Fetch strategies
//!
//! Each strategy retrieves the markup of one URL with a different request
//! shape. They are tried in order for every candidate URL and the first one
//! that returns a non-empty body wins. A strategy never propagates a failure
//! upward: transport errors, bad statuses and empty bodies all become a
//! [`FetchError`] so the chain can move on.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;
use crate::net_utils::error_chain_text;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("HTTP status {status}")]
    Status { status: u16 },

    #[error("response body was empty")]
    EmptyContent,

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Markup retrieved by a successful strategy
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub content: String,
    /// Location after redirects; the base for relative logo URLs
    pub resolved_url: String,
}

pub type FetchOutcome = Result<FetchedPage, FetchError>;

#[async_trait]
pub trait FetchStrategy: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self, url: &str) -> FetchOutcome;
}

/// Browser-like headers sent by [`BrowserSimulationStrategy`]. Compression is
/// negotiated by the client itself so responses are transparently decoded.
const BROWSER_HEADERS: &[(&str, &str)] = &[
    ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7"),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("DNT", "1"),
    ("Upgrade-Insecure-Requests", "1"),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-Site", "none"),
    ("Sec-Fetch-User", "?1"),
    ("sec-ch-ua", "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\""),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Linux\""),
    ("Cache-Control", "max-age=0"),
];

fn browser_header_map() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in BROWSER_HEADERS {
        if let (Ok(name), Ok(value)) = (
            reqwest::header::HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, value);
        }
    }
    headers
}

/// GET with a realistic desktop-browser header set
pub struct BrowserSimulationStrategy {
    client: reqwest::Client,
}

impl BrowserSimulationStrategy {
    pub const NAME: &'static str = "Browser simulation";

    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let settings = &config.strategies.browser;
        Self::new(
            &config.http.browser_user_agent,
            Duration::from_secs(settings.connect_timeout_secs),
            Duration::from_secs(settings.timeout_secs),
            config.http.max_redirects,
        )
    }

    pub fn new(
        user_agent: &str,
        connect_timeout: Duration,
        timeout: Duration,
        max_redirects: usize,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(browser_header_map())
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(max_redirects))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FetchStrategy for BrowserSimulationStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn fetch(&self, url: &str) -> FetchOutcome {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(error_chain_text(&e)))?;

        let status = response.status();
        if !status.is_success() {
            debug!("{}: status {} for {}", Self::NAME, status, url);
            return Err(FetchError::Status { status: status.as_u16() });
        }

        let resolved_url = response.url().to_string();
        let content = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(error_chain_text(&e)))?;

        debug!("{}: status {}, size {} bytes", Self::NAME, status, content.len());
        non_empty(content, resolved_url)
    }
}

/// GET with no custom headers at all, for sites that block browser fingerprints
pub struct HeaderlessStrategy {
    client: reqwest::Client,
    error_preview_chars: usize,
}

impl HeaderlessStrategy {
    pub const NAME: &'static str = "No headers fallback";

    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let settings = &config.strategies.headerless;
        Self::new(
            Duration::from_secs(settings.connect_timeout_secs),
            Duration::from_secs(settings.read_timeout_secs),
            config.http.max_redirects,
            settings.error_preview_chars,
        )
    }

    pub fn new(
        connect_timeout: Duration,
        read_timeout: Duration,
        max_redirects: usize,
        error_preview_chars: usize,
    ) -> Result<Self, FetchError> {
        // No overall deadline; bounded by connect plus per-read timeouts instead
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .read_timeout(read_timeout)
            .redirect(reqwest::redirect::Policy::limited(max_redirects))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;
        Ok(Self {
            client,
            error_preview_chars,
        })
    }
}

#[async_trait]
impl FetchStrategy for HeaderlessStrategy {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn fetch(&self, url: &str) -> FetchOutcome {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(error_chain_text(&e)))?;

        let status = response.status();
        if !status.is_success() {
            // An unreadable error body only loses the preview
            let body = response.text().await.unwrap_or_default();
            let preview: String = body.chars().take(self.error_preview_chars).collect();
            debug!("{}: status {} for {}, preview: {}", Self::NAME, status, url, preview);
            return Err(FetchError::Status { status: status.as_u16() });
        }

        let resolved_url = response.url().to_string();
        let content = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(error_chain_text(&e)))?;
        debug!("{}: status {}, size {} bytes", Self::NAME, status, content.len());

        non_empty(content, resolved_url)
    }
}

fn non_empty(content: String, resolved_url: String) -> FetchOutcome {
    if content.trim().is_empty() {
        return Err(FetchError::EmptyContent);
    }
    Ok(FetchedPage { content, resolved_url })
}

/// The production strategy chain, in priority order
pub fn default_strategies(config: &AppConfig) -> Result<Vec<Box<dyn FetchStrategy>>, FetchError> {
    Ok(vec![
        Box::new(BrowserSimulationStrategy::from_config(config)?),
        Box::new(HeaderlessStrategy::from_config(config)?),
    ])
}
