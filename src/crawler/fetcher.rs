//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent
//! - GET requests to fetch page content, following redirects
//! - Classifying failures so they can be logged and counted

use crate::config::{Config, UserAgentConfig};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects; links on the page resolve against it
    pub final_url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value
    pub content_type: String,

    /// Page body content
    pub body: String,
}

/// Why a URL produced no page
///
/// Any of these means "no links from this URL". The crawl logs the error
/// and carries on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {status}")]
    Http { status: u16 },

    #[error("not an HTML page (Content-Type: {content_type:?})")]
    ContentMismatch { content_type: String },

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to read body: {0}")]
    Body(String),
}

/// The transport used by the crawler
///
/// Called once per enqueued URL. Implementations must be safe to call from
/// many workers at once.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The User-Agent header sent with every request
/// * `timeout` - Total time allowed for one request
///
/// # Example
///
/// ```no_run
/// use mkt_crawler::config::UserAgentConfig;
/// use mkt_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.value.as_str())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed [`Fetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher from the user agent and timeout settings
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
        let client = build_http_client(&config.user_agent, timeout)?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a page with a single GET
    ///
    /// # Outcomes
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx with an HTML Content-Type | `Ok(FetchedPage)` |
    /// | 2xx, any other Content-Type | `ContentMismatch` |
    /// | Non-2xx after redirects | `Http` |
    /// | Timeout | `Timeout` |
    /// | Connection or TLS failure, redirect loop | `Network` |
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.to_ascii_lowercase().contains("html") {
            return Err(FetchError::ContentMismatch { content_type });
        }

        let final_url = response.url().clone();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        })
    }
}

fn classify_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(error.to_string())
    }
}
