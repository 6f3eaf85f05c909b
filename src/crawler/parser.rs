//! HTML parser and link collector
//!
//! This module turns a fetched document into everything a spider needs from it:
//! - The page title (first `<title>` element)
//! - The related pages, collected from `<a>` elements in document order under
//!   the per-page and per-domain caps
//! - The serialized document, which is what the analyzer receives

use crate::config::CrawlerConfig;
use crate::model::{Page, RelatedPages};
use crate::url::{extract_domain, normalize_url};
use scraper::{Html, Selector};
use std::collections::HashMap;

/// Fan-out caps applied while collecting links from one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkLimits {
    /// Maximum number of related pages accepted from one page
    pub max_urls_per_page: usize,

    /// Maximum number of related pages sharing one domain, per page
    pub max_urls_per_page_per_domain: usize,
}

impl From<&CrawlerConfig> for LinkLimits {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            max_urls_per_page: config.max_urls_per_page,
            max_urls_per_page_per_domain: config.max_urls_per_page_per_domain,
        }
    }
}

/// Everything extracted from one fetched document
#[derive(Debug, Clone)]
pub struct ExtractedPage {
    /// Text of the first `<title>`, trimmed; empty when absent
    pub title: String,

    /// Accepted outbound links keyed by canonical URL
    pub related_pages: RelatedPages,

    /// Re-serialized document
    pub html: String,
}

/// Parses a response body and extracts title, related pages and markup
///
/// The parsed document never outlives this call, so callers can hold the
/// result across await points.
///
/// # Arguments
///
/// * `body` - The decoded response body
/// * `current` - The page the body was fetched for
/// * `limits` - Fan-out caps for link collection
pub fn extract_page(body: &str, current: &Page, limits: LinkLimits) -> ExtractedPage {
    let document = Html::parse_document(body);

    ExtractedPage {
        title: extract_title(&document),
        related_pages: collect_related_pages(&document, current, limits),
        html: document.html(),
    }
}

/// Extracts the trimmed text of the first `<title>` element
pub fn extract_title(document: &Html) -> String {
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Collects the related pages of `current` from its document
///
/// # Collection Rules
///
/// Anchors are visited in document order:
///
/// 1. Stop once `max_urls_per_page` links have been accepted
/// 2. Normalize the href against the current URL; skip it on failure
/// 3. Skip URLs already accepted from this page
/// 4. Skip URLs without a registrable domain
/// 5. Count the URL against its domain; skip it once the domain is over
///    `max_urls_per_page_per_domain` (skipped links do not use up the page cap)
/// 6. Accept the URL as an uncrawled page one hop deeper than `current`
///
/// # Example
///
/// ```
/// use scraper::Html;
/// use spider_nest::crawler::{collect_related_pages, LinkLimits};
/// use spider_nest::Page;
///
/// let document = Html::parse_document(r#"<a href="/about">About</a>"#);
/// let page = Page::seed("https://example.com/x");
/// let limits = LinkLimits { max_urls_per_page: 5, max_urls_per_page_per_domain: 5 };
///
/// let related = collect_related_pages(&document, &page, limits);
/// assert_eq!(related["https://example.com/about"].depth, 1);
/// ```
pub fn collect_related_pages(document: &Html, current: &Page, limits: LinkLimits) -> RelatedPages {
    let mut related = RelatedPages::new();

    let Ok(selector) = Selector::parse("a") else {
        return related;
    };

    let mut per_domain: HashMap<String, usize> = HashMap::new();

    for anchor in document.select(&selector) {
        if related.len() >= limits.max_urls_per_page {
            break;
        }

        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let url = match normalize_url(href, &current.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::trace!("Skipping href {:?} on {}: {}", href, current.url, e);
                continue;
            }
        };

        if related.contains_key(&url) {
            continue;
        }

        let Some(domain) = extract_domain(&url) else {
            tracing::trace!("Skipping {} on {}: no registrable domain", url, current.url);
            continue;
        };

        let count = per_domain.entry(domain).or_insert(0);
        *count += 1;
        if *count > limits.max_urls_per_page_per_domain {
            continue;
        }

        let page = current.child(url.clone());
        related.insert(url, page);
    }

    related
}
