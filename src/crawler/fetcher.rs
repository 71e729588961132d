//! HTTP fetcher implementation
//!
//! This module owns the page-fetch capability the rest of the crate calls into:
//! - The [`PageFetcher`] trait used by sitemap traversal and the scrape pipeline
//! - A reqwest-backed [`HttpFetcher`] sending a browser-like header set
//! - Error classification into [`FetchResult`] variants

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// User agent presented to target sites
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT_VALUE: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.5";

/// Timeout for HEAD probes during sitemap discovery
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// Successfully fetched the document
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Document body
        body: String,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns the body of a successful fetch
    pub fn into_body(self) -> Option<String> {
        match self {
            Self::Success { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Describes why the fetch failed, or `None` on success
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Capability to fetch documents over the network
///
/// Every call may fail; callers turn failures into "no result for this URL"
/// and never retry on their own.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches a document body
    async fn fetch(&self, url: &str) -> FetchResult;

    /// Checks whether a URL answers HTTP 200 to a HEAD request
    async fn probe(&self, url: &str) -> bool;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> FetchResult {
        (**self).fetch(url).await
    }

    async fn probe(&self, url: &str) -> bool {
        (**self).probe(url).await
    }
}

/// Builds an HTTP client with browser-like default headers
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_scribe::crawler::build_http_client;
///
/// let client = build_http_client(Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VALUE));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));

    Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed page fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests time out after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(timeout)?,
        })
    }

    /// Wraps an already configured client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return classify_error(&e),
        };

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} answered HTTP {}", url, status.as_u16());
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        match response.text().await {
            Ok(body) => FetchResult::Success {
                final_url,
                status_code: status.as_u16(),
                content_type,
                body,
            },
            Err(e) => FetchResult::NetworkError {
                error: e.to_string(),
            },
        }
    }

    async fn probe(&self, url: &str) -> bool {
        match self.client.head(url).timeout(PROBE_TIMEOUT).send().await {
            Ok(response) => response.status().as_u16() == 200,
            Err(e) => {
                tracing::debug!("Probe of {} failed: {}", url, e);
                false
            }
        }
    }
}

fn classify_error(e: &reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection refused".to_string()
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}
