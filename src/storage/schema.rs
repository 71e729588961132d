//! Database schema for the scrape history

/// SQL schema for the history database
pub const SCHEMA_SQL: &str = r#"
-- URLs that already produced a saved article
CREATE TABLE IF NOT EXISTS scraped_urls (
    url TEXT PRIMARY KEY,
    domain TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    scraped_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_scraped_urls_domain ON scraped_urls(domain);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)
}
