//! Spider worker loop
//!
//! Each spider repeats claim, fetch, extract, enrich, persist until the crawl
//! is cancelled. Page-scoped failures abandon the current page only; anything
//! else ends the spider with an error and, through the coordinator, the crawl.

use crate::crawler::analyzer::AnalyzerClient;
use crate::crawler::fetcher::fetch_page;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{extract_page, LinkLimits};
use crate::model::{Domain, Page};
use crate::storage::GraphStore;
use crate::NestError;
use reqwest::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One worker of the crawl pool
pub struct Spider {
    label: String,
    frontier: Arc<Frontier>,
    store: Arc<dyn GraphStore>,
    client: Client,
    analyzer: Option<AnalyzerClient>,
    limits: LinkLimits,
    max_depth: u32,
    token: CancellationToken,
}

impl Spider {
    /// Creates a spider; `label` only appears in logs
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        label: impl Into<String>,
        frontier: Arc<Frontier>,
        store: Arc<dyn GraphStore>,
        client: Client,
        analyzer: Option<AnalyzerClient>,
        limits: LinkLimits,
        max_depth: u32,
        token: CancellationToken,
    ) -> Self {
        Self {
            label: label.into(),
            frontier,
            store,
            client,
            analyzer,
            limits,
            max_depth,
            token,
        }
    }

    /// The spider's log label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Runs until the token is cancelled or a fatal error occurs
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of pages this spider crawled
    /// * `Err(NestError)` - A fatal error; the crawl must stop
    pub async fn run(self) -> crate::Result<usize> {
        tracing::debug!("Spider started");
        let mut crawled = 0;

        while let Some(page) = self.frontier.claim(&self.token).await {
            let url = page.url.clone();
            match self.crawl(page).await {
                Ok(Some(_)) => crawled += 1,
                Ok(None) => {}
                Err(e) if e.is_page_scoped() => {
                    tracing::warn!(url = %url, "Abandoning page: {}", e);
                }
                Err(e) => {
                    tracing::error!(url = %url, "Fatal error: {}", e);
                    return Err(e);
                }
            }
        }

        tracing::debug!("Spider stopped after {} pages", crawled);
        Ok(crawled)
    }

    /// Processes one claimed page
    ///
    /// Returns `Ok(None)` when the page is past the depth limit or the crawl
    /// was cancelled while the page was in flight.
    async fn crawl(&self, mut page: Page) -> crate::Result<Option<Page>> {
        if page.depth > self.max_depth {
            tracing::debug!(url = %page.url, depth = page.depth, "Depth limit reached");
            return Ok(None);
        }

        let body = tokio::select! {
            _ = self.token.cancelled() => return Ok(None),
            body = fetch_page(&self.client, &page.url) => body?,
        };

        let extracted = extract_page(&body, &page, self.limits);

        let domain = Domain::of_url(&page.url).ok_or_else(|| NestError::NoDomain {
            url: page.url.clone(),
        })?;

        page.title = extracted.title;
        page.domain = Some(domain);
        page.related_pages = extracted.related_pages;

        if let Some(analyzer) = &self.analyzer {
            let html = extracted.html;
            let enrichment = async {
                let summary = analyzer.summarize(&html).await?;
                let keywords = analyzer.keywords(&html).await;
                Ok::<_, NestError>((summary, keywords))
            };

            let (summary, keywords) = tokio::select! {
                _ = self.token.cancelled() => return Ok(None),
                enriched = enrichment => enriched?,
            };
            page.summary = summary;
            page.keywords = keywords;
        }

        page.mark_crawled();

        let record = page.clone();
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.upsert_page(&record))
            .await
            .map_err(|e| NestError::Worker(format!("persist task failed: {}", e)))??;

        let mut queued = 0;
        for (url, related) in &page.related_pages {
            if *url == page.url {
                continue;
            }
            if self.frontier.enqueue(related.clone()) {
                queued += 1;
            } else {
                tracing::debug!(url = %url, "Frontier full, dropping page");
            }
        }

        tracing::info!(
            url = %page.url,
            depth = page.depth,
            related = page.related_count(),
            queued,
            "Crawled {:?}",
            page.title
        );

        self.frontier.complete(page.clone());
        Ok(Some(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteGraphStore;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct Fixture {
        frontier: Arc<Frontier>,
        store: Arc<SqliteGraphStore>,
        token: CancellationToken,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                frontier: Arc::new(Frontier::new(100)),
                store: Arc::new(SqliteGraphStore::open_in_memory().unwrap()),
                token: CancellationToken::new(),
            }
        }

        fn spider(&self, analyzer: Option<AnalyzerClient>, max_depth: u32) -> Spider {
            self.spider_with_client(Client::new(), analyzer, max_depth)
        }

        fn spider_with_client(
            &self,
            client: Client,
            analyzer: Option<AnalyzerClient>,
            max_depth: u32,
        ) -> Spider {
            Spider::new(
                "spider-test",
                Arc::clone(&self.frontier),
                self.store.clone(),
                client,
                analyzer,
                LinkLimits {
                    max_urls_per_page: 5,
                    max_urls_per_page_per_domain: 5,
                },
                max_depth,
                self.token.clone(),
            )
        }
    }

    // The mock server listens on 127.0.0.1, whose domain is "0.1"
    fn page_html(title: &str, links: &[&str]) -> String {
        let anchors: String = links
            .iter()
            .map(|href| format!(r#"<a href="{}">link</a>"#, href))
            .collect();
        format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, anchors
        )
    }

    #[tokio::test]
    async fn test_crawl_persists_and_enqueues() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(page_html("Home", &["/a", "/b", "/"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fixture = Fixture::new();
        let seed = Page::seed(server.uri());
        let page = fixture
            .spider(None, 30)
            .crawl(seed)
            .await
            .unwrap()
            .unwrap();

        assert!(page.is_crawled);
        assert_eq!(page.title, "Home");
        assert_eq!(page.domain, Some(Domain::new("0.1")));
        assert_eq!(page.related_count(), 3);

        // Self link is kept as related but not re-offered
        assert_eq!(fixture.frontier.len(), 2);

        let record = fixture.store.get_page(&server.uri()).unwrap().unwrap();
        assert!(record.is_crawled);
        assert_eq!(record.title, "Home");
        assert_eq!(fixture.store.count_links().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_depth_cutoff_skips_fetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_html("Deep", &[])))
            .expect(0)
            .mount(&server)
            .await;

        let fixture = Fixture::new();
        let deep = Page::found(format!("{}/deep", server.uri()), 3);
        let result = fixture.spider(None, 2).crawl(deep).await.unwrap();

        assert!(result.is_none());
        assert_eq!(fixture.store.count_pages().unwrap(), 0);
        assert!(fixture.frontier.is_empty());
    }

    #[tokio::test]
    async fn test_page_at_max_depth_is_crawled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_html("Edge", &["/next"])))
            .expect(1)
            .mount(&server)
            .await;

        let fixture = Fixture::new();
        let edge = Page::found(format!("{}/edge", server.uri()), 2);
        let page = fixture.spider(None, 2).crawl(edge).await.unwrap().unwrap();

        assert!(page.is_crawled);
        // Offered, then skipped by whichever spider claims it
        assert_eq!(page.related_pages.values().next().unwrap().depth, 3);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_page_scoped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let fixture = Fixture::new();
        let err = fixture
            .spider(None, 30)
            .crawl(Page::seed(server.uri()))
            .await
            .unwrap_err();

        assert!(err.is_page_scoped());
        assert_eq!(fixture.store.count_pages().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_page_without_domain_abandoned() {
        let fixture = Fixture::new();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_html("Local", &[])))
            .mount(&server)
            .await;

        // Same server, reached through a single-label host
        let client = Client::builder()
            .resolve("intranet", *server.address())
            .build()
            .unwrap();
        let port = server.address().port();
        let err = fixture
            .spider_with_client(client, None, 30)
            .crawl(Page::seed(format!("http://intranet:{}", port)))
            .await
            .unwrap_err();

        assert!(matches!(err, NestError::NoDomain { .. }));
    }

    #[tokio::test]
    async fn test_enrichment_fills_summary_and_keywords() {
        let site = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_html("Home", &[])))
            .mount(&site)
            .await;

        let analyzer = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/summarize"))
            .respond_with(ResponseTemplate::new(200).set_body_string("About spiders"))
            .expect(1)
            .mount(&analyzer)
            .await;
        Mock::given(method("POST"))
            .and(path("/keywords"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"["spider"]"#))
            .expect(1)
            .mount(&analyzer)
            .await;

        let fixture = Fixture::new();
        let client = AnalyzerClient::new(Client::new(), &analyzer.uri());
        let page = fixture
            .spider(Some(client), 30)
            .crawl(Page::seed(site.uri()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(page.summary, "About spiders");
        assert_eq!(page.keywords, vec!["spider".to_string()]);

        let record = fixture.store.get_page(&site.uri()).unwrap().unwrap();
        assert_eq!(record.summary, "About spiders");
        assert_eq!(record.keywords, vec!["spider"]);
    }

    #[tokio::test]
    async fn test_summarizer_failure_is_fatal() {
        let site = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_html("Home", &[])))
            .mount(&site)
            .await;

        let fixture = Fixture::new();
        let client = AnalyzerClient::new(Client::new(), "http://127.0.0.1:9");
        fixture.frontier.enqueue(Page::seed(site.uri()));

        let err = fixture.spider(Some(client), 30).run().await.unwrap_err();

        assert!(matches!(err, NestError::Analyzer { .. }));
        assert_eq!(fixture.store.count_pages().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_run_continues_after_page_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/fine"))
            .respond_with(ResponseTemplate::new(200).set_body_string(page_html("Fine", &[])))
            .mount(&server)
            .await;

        let fixture = Fixture::new();
        fixture
            .frontier
            .enqueue(Page::seed(format!("{}/broken", server.uri())));
        fixture
            .frontier
            .enqueue(Page::seed(format!("{}/fine", server.uri())));

        let handle = tokio::spawn(fixture.spider(None, 30).run());

        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while fixture.store.count_crawled_pages().unwrap() < 1 {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
        fixture.token.cancel();

        assert_eq!(handle.await.unwrap().unwrap(), 1);
        let snapshot = fixture.frontier.snapshot();
        assert!(!snapshot[&format!("{}/broken", server.uri())].is_crawled);
        assert!(snapshot[&format!("{}/fine", server.uri())].is_crawled);
    }
}
