//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests to fetch page content
//! - Classifying failures (transport, HTTP status, content type)
//!
//! No retries are performed: a failed fetch is terminal for its unit of work.

use crate::config::CrawlConfig;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Reasons a page could not be fetched
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be completed (DNS, connect, TLS, timeout)
    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    /// The server answered with a client or server error status
    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    /// The response is not an HTML document
    #[error("content-type {content_type:?} is not text/html for {url}")]
    ContentType { url: String, content_type: String },

    /// The response body could not be read
    #[error("failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Fetches raw page markup for a URL
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the HTML body of `url`, or why it could not be fetched
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - Value sent in the `User-Agent` header
/// * `timeout` - Total time allowed for one request
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sitewalk::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("BootCrawler/1.0", Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher using the user agent and timeout from `config`
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.user_agent, config.request_timeout)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL and returns its body if it is an HTML page
///
/// # Failure Rules
///
/// | Condition | Result |
/// |-----------|--------|
/// | Request cannot complete | `Transport` |
/// | Status >= 400 | `HttpStatus` |
/// | Content-Type missing or not `text/html` | `ContentType` |
/// | Body cannot be read | `Body` |
pub async fn fetch_url(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html(&content_type) {
        return Err(FetchError::ContentType {
            url: url.to_string(),
            content_type,
        });
    }

    response.text().await.map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })
}

fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}
