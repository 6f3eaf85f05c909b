use crate::config::types::{
    AnalyzerConfig, Config, CrawlerConfig, HttpConfig, StorageConfig, UserAgentConfig,
};
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Upper bound on the worker pool size
const MAX_SPIDERS: usize = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_http_config(&config.http)?;
    validate_analyzer_config(&config.analyzer)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    // max_depth of 0 is legal: only the seed is fetched

    if config.max_urls_per_page < 1 {
        return Err(ConfigError::Validation(
            "max_urls_per_page must be >= 1".to_string(),
        ));
    }

    if config.max_urls_per_page_per_domain < 1 {
        return Err(ConfigError::Validation(
            "max_urls_per_page_per_domain must be >= 1".to_string(),
        ));
    }

    if config.spider_count < 1 || config.spider_count > MAX_SPIDERS {
        return Err(ConfigError::Validation(format!(
            "spider_count must be between 1 and {}, got {}",
            MAX_SPIDERS, config.spider_count
        )));
    }

    if config.frontier_capacity < 1 {
        return Err(ConfigError::Validation(
            "frontier_capacity must be >= 1".to_string(),
        ));
    }

    if config.crawl_time_ms < 1 {
        return Err(ConfigError::Validation(
            "crawl_time_ms must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> ConfigResult<()> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> ConfigResult<()> {
    if config.timeout_secs < 1 || config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "HTTP timeouts must be >= 1s, got timeout={}s connect={}s",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates the analyzer base URL, even when enrichment is disabled
fn validate_analyzer_config(config: &AnalyzerConfig) -> ConfigResult<()> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid analyzer url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Analyzer url '{}' must use http or https",
            config.url
        )));
    }

    Ok(())
}

/// Validates graph store configuration
fn validate_storage_config(config: &StorageConfig) -> ConfigResult<()> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
