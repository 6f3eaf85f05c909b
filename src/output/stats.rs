//! Statistics from the graph store
//!
//! This module provides functionality for extracting and displaying
//! graph statistics once a crawl has finished.

use crate::storage::{GraphStore, StorageResult};

/// Graph store statistics summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStatistics {
    /// Page nodes, crawled or discovered only
    pub total_pages: u64,

    /// Page nodes that were crawled
    pub crawled_pages: u64,

    /// Domain nodes
    pub domains: u64,

    /// Related-page edges
    pub links: u64,
}

impl StoreStatistics {
    /// Page nodes that were discovered but never crawled
    pub fn uncrawled_pages(&self) -> u64 {
        self.total_pages.saturating_sub(self.crawled_pages)
    }
}

/// Loads statistics from the graph store
///
/// # Arguments
///
/// * `store` - The graph store to query
///
/// # Returns
///
/// * `Ok(StoreStatistics)` - Successfully loaded statistics
/// * `Err(StorageError)` - Failed to query statistics
pub fn load_statistics(store: &dyn GraphStore) -> StorageResult<StoreStatistics> {
    Ok(StoreStatistics {
        total_pages: store.count_pages()?,
        crawled_pages: store.count_crawled_pages()?,
        domains: store.count_domains()?,
        links: store.count_links()?,
    })
}

/// Logs statistics at info level
pub fn log_statistics(stats: &StoreStatistics) {
    tracing::info!(
        "Graph store: {} pages ({} crawled, {} discovered only), {} domains, {} links",
        stats.total_pages,
        stats.crawled_pages,
        stats.uncrawled_pages(),
        stats.domains,
        stats.links
    );
}
