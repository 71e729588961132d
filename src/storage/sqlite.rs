//! SQLite history implementation

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{domain_of, DomainCount, HistoryStore, StorageError, StorageResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed history store
///
/// The connection sits behind a mutex so one store can be shared by every domain
/// worker.
pub struct SqliteHistory {
    conn: Mutex<Connection>,
}

impl SqliteHistory {
    /// Opens or creates the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl HistoryStore for SqliteHistory {
    fn seen(&self, url: &str) -> StorageResult<bool> {
        let found = self
            .conn()?
            .query_row(
                "SELECT 1 FROM scraped_urls WHERE url = ?1",
                params![url],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn mark_seen(&self, url: &str, title: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn()?.execute(
            "INSERT INTO scraped_urls (url, domain, title, scraped_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(url) DO UPDATE SET title = excluded.title, scraped_at = excluded.scraped_at",
            params![url, domain_of(url), title, now],
        )?;
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.conn()?.execute("DELETE FROM scraped_urls", [])?;
        Ok(())
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 =
            self.conn()?
                .query_row("SELECT COUNT(*) FROM scraped_urls", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_by_domain(&self) -> StorageResult<Vec<DomainCount>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT domain, COUNT(*) FROM scraped_urls
             GROUP BY domain ORDER BY COUNT(*) DESC, domain ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(DomainCount {
                domain: row.get(0)?,
                count: row.get::<_, i64>(1)? as u64,
            })
        })?;

        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }
}
