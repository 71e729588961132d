//! Storage module for scrape history
//!
//! This module handles remembering which URLs have already produced an article:
//! - The [`HistoryStore`] trait injected into the scrape pipeline and domain workers
//! - A SQLite-backed store persisted across runs
//! - An in-memory store for single runs and tests

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryHistory;
pub use schema::{initialize_schema, SCHEMA_SQL};
pub use sqlite::SqliteHistory;
pub use traits::{DomainCount, HistoryStore, StorageError, StorageResult};

use std::path::Path;

/// Opens or creates the history database at `path`
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteHistory)` - Successfully opened history
/// * `Err(StorageError)` - Failed to open or initialize the database
pub fn open_history(path: &Path) -> StorageResult<SqliteHistory> {
    SqliteHistory::new(path)
}
