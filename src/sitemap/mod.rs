//! Sitemap module for Sumi-Scribe
//!
//! This module handles:
//! - Parsing sitemap XML (`<urlset>` and `<sitemapindex>` documents)
//! - Lazily traversing a sitemap, resolving one level of sitemap index
//! - Probing conventional locations to discover a site's sitemap

mod discovery;
mod parser;
mod traverser;

pub use discovery::{discover_sitemap, SITEMAP_PATHS};
pub use parser::{parse_sitemap, SitemapDocument};
pub use traverser::{select_child_sitemaps, traverse, SitemapTraverser, TraversalOptions};

/// A single `<url>` entry from a sitemap
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Page URL from `<loc>`
    pub url: String,

    /// `<lastmod>` value, verbatim
    pub last_modified: Option<String>,

    /// `<changefreq>` value, verbatim
    pub change_frequency: Option<String>,

    /// `<priority>` value; `None` when missing or not a number
    pub priority: Option<f64>,
}

impl SitemapEntry {
    /// Creates an entry with only a URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            last_modified: None,
            change_frequency: None,
            priority: None,
        }
    }
}
