//! HTTP fetcher implementation
//!
//! This module handles page requests for the spiders:
//! - Building the shared HTTP client with the crawler's user agent
//! - GET requests for page bodies
//! - Classifying failures as page-scoped errors

use crate::config::Config;
use crate::NestError;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client shared by all spiders
///
/// The user agent is `CrawlerName/Version`. Redirects follow reqwest's default
/// policy; the page keeps the URL it was claimed under.
///
/// # Example
///
/// ```
/// use spider_nest::config::Config;
/// use spider_nest::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.header_value())
        .timeout(Duration::from_secs(config.http.timeout_secs))
        .connect_timeout(Duration::from_secs(config.http.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page body
///
/// # Error Classification
///
/// | Condition | Error |
/// |-----------|-------|
/// | Transport failure (DNS, connect, timeout) | `NestError::Http` |
/// | Non-2xx status | `NestError::HttpStatus` |
/// | Body cannot be read or decoded | `NestError::HtmlParse` |
///
/// All three are page-scoped: the spider logs them and moves on.
pub async fn fetch_page(client: &Client, url: &str) -> crate::Result<String> {
    let response = client.get(url).send().await.map_err(|source| NestError::Http {
        url: url.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(NestError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| NestError::HtmlParse {
        url: url.to_string(),
        message: e.to_string(),
    })
}
