//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Spider-Nest graph.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Domain nodes, shared by every page in the domain
CREATE TABLE IF NOT EXISTS domains (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

-- Page nodes, keyed by canonical URL
CREATE TABLE IF NOT EXISTS pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    url TEXT NOT NULL UNIQUE,
    domain_id INTEGER REFERENCES domains(id),
    title TEXT NOT NULL DEFAULT '',
    summary TEXT NOT NULL DEFAULT '',
    is_crawled INTEGER NOT NULL DEFAULT 0,
    depth INTEGER NOT NULL,
    time_found TEXT NOT NULL,
    time_crawled TEXT
);

CREATE INDEX IF NOT EXISTS idx_pages_domain ON pages(domain_id);
CREATE INDEX IF NOT EXISTS idx_pages_title ON pages(title);
CREATE INDEX IF NOT EXISTS idx_pages_is_crawled ON pages(is_crawled);
CREATE INDEX IF NOT EXISTS idx_pages_depth ON pages(depth);

-- Timestamps are RFC 3339; the first 13 characters are the hour bucket
CREATE INDEX IF NOT EXISTS idx_pages_time_found ON pages(substr(time_found, 1, 13));
CREATE INDEX IF NOT EXISTS idx_pages_time_crawled ON pages(substr(time_crawled, 1, 13));

-- Ordered keyword list of a page
CREATE TABLE IF NOT EXISTS page_keywords (
    page_id INTEGER NOT NULL REFERENCES pages(id),
    position INTEGER NOT NULL,
    keyword TEXT NOT NULL,
    PRIMARY KEY(page_id, position)
);

CREATE INDEX IF NOT EXISTS idx_page_keywords_keyword ON page_keywords(keyword);

-- Directed related-page edges
CREATE TABLE IF NOT EXISTS related_pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    from_page_id INTEGER NOT NULL REFERENCES pages(id),
    to_page_id INTEGER NOT NULL REFERENCES pages(id),
    UNIQUE(from_page_id, to_page_id)
);

CREATE INDEX IF NOT EXISTS idx_related_from ON related_pages(from_page_id);
CREATE INDEX IF NOT EXISTS idx_related_to ON related_pages(to_page_id);

-- Full-text index over summary and keywords; rowid is the page id
CREATE VIRTUAL TABLE IF NOT EXISTS page_text USING fts5(summary, keywords);
"#;

/// Drops every table the schema creates
const DROP_SQL: &str = r#"
DROP TABLE IF EXISTS page_text;
DROP TABLE IF EXISTS related_pages;
DROP TABLE IF EXISTS page_keywords;
DROP TABLE IF EXISTS pages;
DROP TABLE IF EXISTS domains;
"#;

/// Installs the schema if it is missing
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
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Drops all data and reinstalls the schema
pub fn reset_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(DROP_SQL)?;
    initialize_schema(conn)
}
