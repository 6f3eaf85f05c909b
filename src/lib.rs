//! Spider-Nest: a concurrent, depth-bounded web crawler
//!
//! A pool of spiders claims pages from a shared frontier, fetches them, collects
//! their outbound links under per-page and per-domain caps, and persists every
//! crawled page into a graph-structured store.

pub mod config;
pub mod crawler;
pub mod model;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Spider-Nest operations
#[derive(Debug, Error)]
pub enum NestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("No registrable domain for {url}")]
    NoDomain { url: String },

    #[error("Analyzer endpoint {endpoint} failed: {message}")]
    Analyzer { endpoint: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Spider task failed: {0}")]
    Worker(String),
}

impl NestError {
    /// Returns true if the error only affects the page being crawled
    ///
    /// Page-scoped errors are logged and the spider moves on to its next page.
    /// Every other error terminates the whole crawl.
    pub fn is_page_scoped(&self) -> bool {
        matches!(
            self,
            Self::Http { .. }
                | Self::HttpStatus { .. }
                | Self::HtmlParse { .. }
                | Self::NoDomain { .. }
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Spider-Nest operations
pub type Result<T> = std::result::Result<T, NestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, Frontier};
pub use model::{Domain, Page};
pub use crate::url::{extract_domain, normalize_url};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_scoped_errors() {
        let err = NestError::HttpStatus {
            url: "http://example.com".to_string(),
            status: 404,
        };
        assert!(err.is_page_scoped());

        let err = NestError::NoDomain {
            url: "http://localhost".to_string(),
        };
        assert!(err.is_page_scoped());
    }

    #[test]
    fn test_fatal_errors() {
        let err = NestError::Analyzer {
            endpoint: "http://localhost:9898/summarize".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(!err.is_page_scoped());

        let err = NestError::Storage(storage::StorageError::Database("locked".to_string()));
        assert!(!err.is_page_scoped());

        let err = NestError::Worker("panicked".to_string());
        assert!(!err.is_page_scoped());
    }
}
