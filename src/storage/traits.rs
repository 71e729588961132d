//! History store trait and error types

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("History store lock poisoned")]
    LockPoisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Number of remembered URLs for one domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainCount {
    pub domain: String,
    pub count: u64,
}

/// Record of URLs that already produced an article
///
/// The scrape pipeline consults it before fetching and workers mark every saved
/// article. Implementations are shared between domain workers, so they must be
/// safe to call from several tasks at once.
pub trait HistoryStore: Send + Sync {
    /// Returns true if `url` has been marked
    fn seen(&self, url: &str) -> StorageResult<bool>;

    /// Remembers `url`; marking an already seen URL updates its title and time
    ///
    /// # Arguments
    ///
    /// * `url` - The article URL
    /// * `title` - The article title, kept for reporting
    fn mark_seen(&self, url: &str, title: &str) -> StorageResult<()>;

    /// Forgets every URL
    fn clear(&self) -> StorageResult<()>;

    /// Total number of remembered URLs
    fn count(&self) -> StorageResult<u64>;

    /// Remembered URLs per domain, largest first, ties by domain name
    fn count_by_domain(&self) -> StorageResult<Vec<DomainCount>>;
}

/// Domain recorded alongside a URL; empty when the URL does not parse
pub(crate) fn domain_of(url: &str) -> String {
    ::url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
        .unwrap_or_default()
}
