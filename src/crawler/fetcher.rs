//! HTTP fetcher implementation
//!
//! This module handles the network side of a visit:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests for page content
//! - Error classification (status, content type, timeout)
//!
//! Failures are reported, never retried.

use crate::config::Config;
use crate::FetchError;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client};

/// Content types accepted as pages
const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// Maximum redirect hops followed per fetch
const MAX_REDIRECTS: usize = 10;

/// Source of page content for workers
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches the HTML body of `url`
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// `PageFetcher` backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher from the crawler configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        fetch_url(&self.client, url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration (timeouts and user agent)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use site_mapper::config::Config;
/// use site_mapper::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(config.crawler.fetch_timeout())
        .connect_timeout(config.crawler.connect_timeout())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns its body if it is an HTML page
///
/// # Error Mapping
///
/// | Condition | Error |
/// |-----------|-------|
/// | Timeout (connect or total) | `FetchError::Timeout` |
/// | Connection / DNS / TLS failure | `FetchError::Request` |
/// | Non-2xx status | `FetchError::Status` |
/// | Content-Type not HTML | `FetchError::ContentMismatch` |
/// | Body read failure | `FetchError::Body` |
///
/// A missing Content-Type header is treated as HTML.
pub async fn fetch_url(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await.map_err(|source| {
        if source.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                source,
            }
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
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

    if !content_type.is_empty() && !is_html(&content_type) {
        return Err(FetchError::ContentMismatch {
            url: url.to_string(),
            content_type,
        });
    }

    response.text().await.map_err(|source| {
        if source.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Body {
                url: url.to_string(),
                source,
            }
        }
    })
}

fn is_html(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    HTML_CONTENT_TYPES
        .iter()
        .any(|accepted| content_type.contains(accepted))
}
