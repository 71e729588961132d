//! Lazy sitemap traversal
//!
//! [`SitemapTraverser`] is a pull-based cursor: each call to
//! [`SitemapTraverser::next_entry`] produces one entry, fetching the root document or
//! the next child sitemap only when the buffered entries run out. Dropping the cursor
//! is the cancellation mechanism.

use crate::crawler::PageFetcher;
use crate::sitemap::{parse_sitemap, SitemapDocument, SitemapEntry};
use regex::Regex;
use std::collections::VecDeque;

/// Child sitemaps containing any of these are skipped when no post sitemap exists
const IGNORED_SITEMAP_KEYWORDS: &[&str] = &["category", "tag", "author", "user", "page"];

/// Bounds and filters for a traversal
#[derive(Debug, Clone, Default)]
pub struct TraversalOptions {
    /// Entries whose URL does not match are dropped
    pub url_filter: Option<Regex>,

    /// Stop after this many entries in total
    pub max_urls: Option<usize>,
}

/// Chooses which child sitemaps of an index to traverse
///
/// If any child's final path segment contains "post" (case-insensitive), only those
/// children are kept. Otherwise every child is kept except the ones whose URL mentions
/// a taxonomy or listing keyword (`category`, `tag`, `author`, `user`, `page`).
/// Index order is preserved.
pub fn select_child_sitemaps(children: Vec<String>) -> Vec<String> {
    let is_post_sitemap = |url: &String| {
        url.to_lowercase()
            .rsplit('/')
            .next()
            .is_some_and(|segment| segment.contains("post"))
    };

    if children.iter().any(is_post_sitemap) {
        let posts: Vec<String> = children.into_iter().filter(is_post_sitemap).collect();
        tracing::info!("Filtering for post sitemaps only ({} found)", posts.len());
        return posts;
    }

    children
        .into_iter()
        .filter(|url| {
            let lower = url.to_lowercase();
            let ignored = IGNORED_SITEMAP_KEYWORDS.iter().any(|k| lower.contains(k));
            if ignored {
                tracing::debug!("Skipping non-content sitemap {}", url);
            }
            !ignored
        })
        .collect()
}

/// Starts a traversal of `sitemap_url`
///
/// Returns an error only when `url_filter` is not a valid regex. Nothing is fetched
/// until the first [`SitemapTraverser::next_entry`] call.
pub fn traverse<'a, F: PageFetcher + ?Sized>(
    fetcher: &'a F,
    sitemap_url: &str,
    url_filter: Option<&str>,
    max_urls: Option<usize>,
) -> Result<SitemapTraverser<'a, F>, regex::Error> {
    let url_filter = url_filter.map(Regex::new).transpose()?;
    Ok(SitemapTraverser::new(
        fetcher,
        sitemap_url,
        TraversalOptions {
            url_filter,
            max_urls,
        },
    ))
}

/// Pull-based cursor over the entries of a sitemap or sitemap index
pub struct SitemapTraverser<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    root_url: String,
    options: TraversalOptions,
    started: bool,
    pending_sitemaps: VecDeque<String>,
    buffered: VecDeque<SitemapEntry>,
    yielded: usize,
}

impl<'a, F: PageFetcher + ?Sized> SitemapTraverser<'a, F> {
    /// Creates a traverser; the root document is fetched on the first pull
    pub fn new(fetcher: &'a F, sitemap_url: &str, options: TraversalOptions) -> Self {
        Self {
            fetcher,
            root_url: sitemap_url.to_string(),
            options,
            started: false,
            pending_sitemaps: VecDeque::new(),
            buffered: VecDeque::new(),
            yielded: 0,
        }
    }

    /// Number of entries produced so far
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    /// Produces the next entry, or `None` once the sitemap or the bound is exhausted
    pub async fn next_entry(&mut self) -> Option<SitemapEntry> {
        loop {
            if self.limit_reached() {
                return None;
            }

            if let Some(entry) = self.buffered.pop_front() {
                if self.accepts(&entry) {
                    self.yielded += 1;
                    return Some(entry);
                }
                continue;
            }

            if !self.started {
                self.started = true;
                self.load_root().await;
                continue;
            }

            let child = self.pending_sitemaps.pop_front()?;
            self.load_child(&child).await;
        }
    }

    /// Drains the remaining entries into a vector
    pub async fn collect_all(mut self) -> Vec<SitemapEntry> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next_entry().await {
            entries.push(entry);
        }
        entries
    }

    fn limit_reached(&self) -> bool {
        self.options
            .max_urls
            .is_some_and(|max| self.yielded >= max)
    }

    fn accepts(&self, entry: &SitemapEntry) -> bool {
        self.options
            .url_filter
            .as_ref()
            .map_or(true, |pattern| pattern.is_match(&entry.url))
    }

    async fn load_root(&mut self) {
        let Some(xml) = self.fetch_document(&self.root_url.clone()).await else {
            return;
        };

        match parse_sitemap(&xml) {
            SitemapDocument::Index(children) => {
                tracing::info!(
                    "Found sitemap index with {} nested sitemaps",
                    children.len()
                );
                self.pending_sitemaps = select_child_sitemaps(children).into();
            }
            SitemapDocument::UrlSet(entries) => {
                self.buffered = entries.into();
            }
        }
    }

    async fn load_child(&mut self, url: &str) {
        let Some(xml) = self.fetch_document(url).await else {
            return;
        };

        match parse_sitemap(&xml) {
            SitemapDocument::UrlSet(entries) => self.buffered = entries.into(),
            SitemapDocument::Index(_) => {
                tracing::warn!("Nested sitemap index {} is not traversed", url);
            }
        }
    }

    async fn fetch_document(&self, url: &str) -> Option<String> {
        tracing::info!("Fetching sitemap: {}", url);
        let result = self.fetcher.fetch(url).await;
        if let Some(reason) = result.failure_reason() {
            tracing::error!("Failed to fetch sitemap {}: {}", url, reason);
        }
        result.into_body()
    }
}
