use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Spider-Nest
///
/// Every section is optional in the TOML file; missing keys fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub http: HttpConfig,
    pub analyzer: AnalyzerConfig,
    pub storage: StorageConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Pages deeper than this are never fetched
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Maximum number of links accepted from a single page
    #[serde(rename = "max-urls-per-page")]
    pub max_urls_per_page: usize,

    /// Maximum number of links accepted from a single page for one domain
    #[serde(rename = "max-urls-per-page-per-domain")]
    pub max_urls_per_page_per_domain: usize,

    /// Number of spiders in the worker pool
    #[serde(rename = "spider-count")]
    pub spider_count: usize,

    /// Capacity of the frontier queue; discoveries beyond it are dropped
    #[serde(rename = "frontier-capacity")]
    pub frontier_capacity: usize,

    /// Length of the crawl window (milliseconds)
    #[serde(rename = "crawl-time-ms")]
    pub crawl_time_ms: u64,
}

impl CrawlerConfig {
    /// Returns the crawl window as a Duration
    pub fn crawl_time(&self) -> Duration {
        Duration::from_millis(self.crawl_time_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 30,
            max_urls_per_page: 5,
            max_urls_per_page_per_domain: 5,
            spider_count: 5,
            frontier_capacity: 10_000,
            crawl_time_ms: 70_000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value (`Name/Version`)
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "spider-nest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

/// Enrichment service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Whether pages are sent to the analyzer for summary and keywords
    pub enabled: bool,

    /// Base URL of the analyzer service
    pub url: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "http://localhost:9898".to_string(),
        }
    }
}

/// Graph store configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "./spider-nest.db".to_string(),
        }
    }
}
