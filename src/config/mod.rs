//! Configuration module for Spider-Nest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; a missing file section falls back to the built-in
//! crawl limits.
//!
//! # Example
//!
//! ```no_run
//! use spider_nest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("nest.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AnalyzerConfig, Config, CrawlerConfig, HttpConfig, StorageConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate;
