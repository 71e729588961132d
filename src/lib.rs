//! Sumi-Scribe: a best-effort article harvester
//!
//! This crate crawls websites for single-post article pages. It classifies URLs as
//! posts or archive listings, walks XML sitemaps (including sitemap indexes), and
//! extracts a normalized article record from each accepted page.

pub mod article;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod sitemap;
pub mod storage;
pub mod url;

#[cfg(test)]
pub(crate) mod test_support;

use thiserror::Error;

/// Main error type for Sumi-Scribe operations
#[derive(Debug, Error)]
pub enum ScribeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid pattern in config: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Sumi-Scribe operations
pub type Result<T> = std::result::Result<T, ScribeError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use article::{ArticleRecord, ContentSection};
pub use config::Config;
pub use crawler::{ArticleScraper, HttpFetcher, PageFetcher, ScrapeOutcome};
pub use extract::ContentExtractor;
pub use sitemap::{SitemapEntry, SitemapTraverser};
pub use url::{UrlClassification, UrlClassifier};
