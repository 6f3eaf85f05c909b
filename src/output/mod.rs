//! Output module for crawl reports
//!
//! This module handles:
//! - The table of crawled pages printed at the end of a run
//! - Statistics loaded from the graph store

mod report;
pub mod stats;

pub use report::{print_report, render_table, CrawlReport, ReportRow};
pub use stats::{load_statistics, log_statistics, StoreStatistics};
