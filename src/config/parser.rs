use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use spider_nest::config::load_config;
///
/// let config = load_config(Path::new("nest.toml")).unwrap();
/// println!("Spiders: {}", config.crawler.spider_count);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration at `path`, or the defaults when no path is given
pub fn load_config_or_default(path: Option<&Path>) -> ConfigResult<Config> {
    match path {
        Some(path) => load_config(path),
        None => {
            let config = Config::default();
            validate(&config)?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[crawler]
max-depth = 3
max-urls-per-page = 10
max-urls-per-page-per-domain = 2
spider-count = 8
frontier-capacity = 500
crawl-time-ms = 5000

[user-agent]
crawler-name = "TestNest"
crawler-version = "1.0"

[analyzer]
enabled = true
url = "http://127.0.0.1:9898"

[storage]
database-path = "./test.db"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.max_depth, 3);
        assert_eq!(config.crawler.max_urls_per_page, 10);
        assert_eq!(config.crawler.max_urls_per_page_per_domain, 2);
        assert_eq!(config.crawler.spider_count, 8);
        assert_eq!(config.crawler.frontier_capacity, 500);
        assert_eq!(config.crawler.crawl_time_ms, 5000);
        assert_eq!(config.user_agent.header_value(), "TestNest/1.0");
        assert!(config.analyzer.enabled);
        assert_eq!(config.storage.database_path, "./test.db");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = parse_config("[crawler]\nspider-count = 2\n").unwrap();

        assert_eq!(config.crawler.spider_count, 2);
        assert_eq!(config.crawler.max_depth, 30);
        assert_eq!(config.crawler.max_urls_per_page, 5);
        assert_eq!(config.crawler.frontier_capacity, 10_000);
        assert!(!config.analyzer.enabled);
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = parse_config("").unwrap();
        assert_eq!(config.crawler.crawl_time_ms, 70_000);
        assert_eq!(config.user_agent.crawler_name, "spider-nest");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/nest.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nspider-count = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_config_or_default() {
        let config = load_config_or_default(None).unwrap();
        assert_eq!(config.crawler.spider_count, 5);

        let file = create_temp_config("[crawler]\nmax-depth = 1\n");
        let config = load_config_or_default(Some(file.path())).unwrap();
        assert_eq!(config.crawler.max_depth, 1);
    }
}
