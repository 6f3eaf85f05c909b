//! Client for the enrichment service
//!
//! The analyzer exposes two endpoints, both taking the raw HTML of a page as
//! the request body:
//! - `POST /summarize` returns a plain-text summary
//! - `POST /keywords` returns a JSON array of strings
//!
//! A summarizer failure is fatal to the crawl. A keywords failure of any kind
//! degrades to an empty list.

use crate::NestError;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

const SUMMARIZE_PATH: &str = "/summarize";
const KEYWORDS_PATH: &str = "/keywords";

/// HTTP client for the summary and keyword endpoints
#[derive(Debug, Clone)]
pub struct AnalyzerClient {
    client: Client,
    summarize_url: String,
    keywords_url: String,
}

impl AnalyzerClient {
    /// Creates a client for the analyzer at `base_url`
    pub fn new(client: Client, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            client,
            summarize_url: format!("{}{}", base, SUMMARIZE_PATH),
            keywords_url: format!("{}{}", base, KEYWORDS_PATH),
        }
    }

    /// Requests a summary of `html`
    ///
    /// Transport failures, non-2xx responses and unreadable bodies all return
    /// `NestError::Analyzer`, which stops the crawl.
    pub async fn summarize(&self, html: &str) -> crate::Result<String> {
        let response = self
            .post(&self.summarize_url, html)
            .await
            .map_err(|e| self.summarize_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.summarize_error(format!("status {}", status.as_u16())));
        }

        response
            .text()
            .await
            .map_err(|e| self.summarize_error(e.to_string()))
    }

    /// Requests the keywords of `html`
    ///
    /// Any failure (transport, status, malformed JSON) yields an empty list.
    pub async fn keywords(&self, html: &str) -> Vec<String> {
        let response = match self.post(&self.keywords_url, html).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Keywords request failed: {}", e);
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Keywords request returned {}", response.status());
            return Vec::new();
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Failed to read keywords body: {}", e);
                return Vec::new();
            }
        };

        serde_json::from_str::<Vec<String>>(&body).unwrap_or_else(|e| {
            tracing::debug!("Malformed keywords response: {}", e);
            Vec::new()
        })
    }

    async fn post(&self, url: &str, html: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .post(url)
            .header(CONTENT_TYPE, "text/html; charset=utf-8")
            .body(html.to_string())
            .send()
            .await
    }

    fn summarize_error(&self, message: String) -> NestError {
        NestError::Analyzer {
            endpoint: self.summarize_url.clone(),
            message,
        }
    }
}
