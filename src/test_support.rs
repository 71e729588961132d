//! Test doubles shared by unit tests

use crate::crawler::{FetchResult, PageFetcher};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// In-memory fetcher serving canned documents and recording every request
#[derive(Debug, Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    probe_ok: HashSet<String>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for `url`
    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), body.to_string());
        self
    }

    /// Makes `probe(url)` succeed
    pub fn with_probe(mut self, url: &str) -> Self {
        self.probe_ok.insert(url.to_string());
        self
    }

    /// URLs passed to `fetch`, in call order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        match self.pages.get(url) {
            Some(body) => FetchResult::Success {
                final_url: url.to_string(),
                status_code: 200,
                content_type: "text/html".to_string(),
                body: body.clone(),
            },
            None => FetchResult::HttpError { status_code: 404 },
        }
    }

    async fn probe(&self, url: &str) -> bool {
        self.probe_ok.contains(url)
    }
}

/// Builds a `<urlset>` sitemap listing `urls`
pub fn urlset(urls: &[&str]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<url><loc>{}</loc></url>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

/// Builds a `<sitemapindex>` listing child sitemap URLs
pub fn sitemap_index(children: &[&str]) -> String {
    let entries: String = children
        .iter()
        .map(|u| format!("<sitemap><loc>{}</loc></sitemap>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

/// Builds an article page whose body paragraph is long enough to be accepted
pub fn article_page(title: &str) -> String {
    format!(
        r#"<html><head><meta property="og:title" content="{title}"></head>
        <body><article><h1>{title}</h1>
        <p>This paragraph is long enough to pass the minimum content length check for an article page body.</p>
        <h2>Details</h2><p>More text follows here.</p></article></body></html>"#
    )
}
