/// Page definitions for the crawl unit
///
/// A page is created in the "found, uncrawled" state, either as the seed or as a
/// discovery on a parent page, and transitions to "crawled" exactly once.
use crate::model::Domain;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;

/// Outbound links of a page keyed by canonical URL, in document order
pub type RelatedPages = IndexMap<String, Page>;

/// A single crawl unit, identified by its canonical URL
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Canonical URL; never changes once the page exists
    pub url: String,

    /// Document title, set after the crawl
    pub title: String,

    /// Summary from the analyzer, set after enrichment
    pub summary: String,

    /// Keywords from the analyzer, set after enrichment
    pub keywords: Vec<String>,

    /// Registrable domain of the page's own URL, set after the crawl
    pub domain: Option<Domain>,

    /// Hop count from the seed
    pub depth: u32,

    /// Whether a spider finished crawling this page
    pub is_crawled: bool,

    /// When the page was discovered
    pub time_found: DateTime<Utc>,

    /// When the crawl of this page completed
    pub time_crawled: Option<DateTime<Utc>>,

    /// Pages linked from this one, populated after a successful crawl
    pub related_pages: RelatedPages,
}

impl Page {
    /// Creates the depth-0 seed page
    pub fn seed(url: impl Into<String>) -> Self {
        Self::found(url, 0)
    }

    /// Creates a freshly discovered, uncrawled page
    pub fn found(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            summary: String::new(),
            keywords: Vec::new(),
            domain: None,
            depth,
            is_crawled: false,
            time_found: Utc::now(),
            time_crawled: None,
            related_pages: RelatedPages::new(),
        }
    }

    /// Creates a page discovered as a link on `self`, one hop deeper
    pub fn child(&self, url: impl Into<String>) -> Self {
        Self::found(url, self.depth + 1)
    }

    /// Marks the page as crawled now
    pub fn mark_crawled(&mut self) {
        self.is_crawled = true;
        self.time_crawled = Some(Utc::now());
    }

    /// Number of related pages found on this page
    pub fn related_count(&self) -> usize {
        self.related_pages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_page() {
        let page = Page::seed("https://example.com");
        assert_eq!(page.depth, 0);
        assert!(!page.is_crawled);
        assert!(page.time_crawled.is_none());
        assert!(page.domain.is_none());
        assert_eq!(page.related_count(), 0);
    }

    #[test]
    fn test_child_is_one_hop_deeper() {
        let parent = Page::found("https://example.com/a", 3);
        let child = parent.child("https://example.com/b");
        assert_eq!(child.depth, 4);
        assert!(!child.is_crawled);
        assert!(child.time_found >= parent.time_found);
    }

    #[test]
    fn test_mark_crawled() {
        let mut page = Page::seed("https://example.com");
        page.mark_crawled();
        assert!(page.is_crawled);
        assert!(page.time_crawled.is_some());
    }
}
