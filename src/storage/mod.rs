//! Storage module for persisting the crawl graph
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and the destructive startup reset
//! - Upserting crawled pages with their domain and related pages
//! - Read queries and counters used for reporting

mod schema;
mod sqlite;
mod traits;

pub use schema::{initialize_schema, reset_schema, SCHEMA_SQL};
pub use sqlite::SqliteGraphStore;
pub use traits::{GraphStore, StorageError, StorageResult};

use chrono::{DateTime, Utc};
use std::path::Path;

/// Opens the SQLite graph store at `path`
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteGraphStore)` - Successfully opened store
/// * `Err(StorageError)` - Failed to open the database
pub fn open_store(path: &Path) -> StorageResult<SqliteGraphStore> {
    SqliteGraphStore::open(path)
}

/// Represents a page node read back from the store
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    pub id: i64,
    pub url: String,
    pub domain: Option<String>,
    pub title: String,
    pub summary: String,
    pub keywords: Vec<String>,
    pub is_crawled: bool,
    pub depth: u32,
    pub time_found: DateTime<Utc>,
    pub time_crawled: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Page;

    #[test]
    fn test_open_store_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.db");

        let store = open_store(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.count_pages().unwrap(), 0);

        store.upsert_page(&Page::seed("https://example.com")).unwrap();
        drop(store);

        // Reopening keeps the data until the caller resets it
        let store = open_store(&path).unwrap();
        assert_eq!(store.count_pages().unwrap(), 1);
        store.reset().unwrap();
        assert_eq!(store.count_pages().unwrap(), 0);
    }

    #[test]
    fn test_open_store_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("graph.db");

        assert!(matches!(open_store(&path), Err(StorageError::Sqlite(_))));
    }
}
