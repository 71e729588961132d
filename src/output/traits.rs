//! Output sink trait and error types

use crate::article::ArticleRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("Unknown output format: {0} (expected json, txt or md)")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for completed articles
///
/// Sinks are shared by domain workers and may be called concurrently.
pub trait ArticleSink: Send + Sync {
    /// Persists one article and returns a description of where it went
    fn save(&self, article: &ArticleRecord) -> OutputResult<String>;
}
