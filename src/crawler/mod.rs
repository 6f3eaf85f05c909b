//! Crawler module for the concurrent crawl engine
//!
//! This module contains the core crawling logic, including:
//! - The shared frontier with at-most-once claims and drop-on-full enqueue
//! - HTTP fetching and the analyzer client
//! - HTML parsing and capped link collection
//! - The spider worker loop and overall crawl coordination

mod analyzer;
mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod spider;

pub use analyzer::AnalyzerClient;
pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_page};
pub use frontier::Frontier;
pub use parser::{collect_related_pages, extract_page, extract_title, ExtractedPage, LinkLimits};
pub use spider::Spider;
