//! Storage traits and error types
//!
//! This module defines the trait interface for graph store backends and
//! associated error types.

use crate::model::Page;
use crate::storage::PageRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid timestamp {value:?}: {message}")]
    InvalidTimestamp { value: String, message: String },

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for graph store implementations
///
/// Pages and domains are nodes; `related_pages` are directed edges between
/// pages; every page points at the single node of its domain. Implementations
/// must be shareable between spiders, so every method takes `&self`.
pub trait GraphStore: Send + Sync {
    // ===== Lifecycle =====

    /// Drops all data and installs a fresh schema
    fn reset(&self) -> StorageResult<()>;

    // ===== Writes =====

    /// Writes a page, its domain and its related pages in one transaction
    ///
    /// An existing page with the same URL is updated rather than duplicated, and
    /// the domain node is shared by all pages of that domain. Related pages that
    /// do not exist yet are created as uncrawled nodes; existing ones keep their
    /// fields.
    ///
    /// # Returns
    ///
    /// The id of the written page
    fn upsert_page(&self, page: &Page) -> StorageResult<i64>;

    // ===== Reads =====

    /// Gets a page by URL
    fn get_page(&self, url: &str) -> StorageResult<Option<PageRecord>>;

    /// Gets the URLs a page links to, in the order they were found
    fn related_urls(&self, url: &str) -> StorageResult<Vec<String>>;

    /// Gets the URLs of all pages pointing at a domain
    fn pages_in_domain(&self, domain: &str) -> StorageResult<Vec<String>>;

    /// Full-text search over summaries and keywords
    fn search(&self, query: &str) -> StorageResult<Vec<String>>;

    // ===== Statistics =====

    /// Counts all page nodes, crawled or not
    fn count_pages(&self) -> StorageResult<u64>;

    /// Counts crawled page nodes
    fn count_crawled_pages(&self) -> StorageResult<u64>;

    /// Counts domain nodes
    fn count_domains(&self) -> StorageResult<u64>;

    /// Counts related-page edges
    fn count_links(&self) -> StorageResult<u64>;
}
