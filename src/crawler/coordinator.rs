//! Crawler coordinator - main crawl orchestration logic
//!
//! The coordinator owns the frontier and the worker pool for one crawl run:
//! - Canonicalizing the target URL and seeding the frontier with it
//! - Spawning the spiders, each with its own log label
//! - Running the pool for the fixed crawl window
//! - Cancelling and draining the spiders, then building the report

use crate::config::Config;
use crate::crawler::analyzer::AnalyzerClient;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::LinkLimits;
use crate::crawler::spider::Spider;
use crate::model::Page;
use crate::output::CrawlReport;
use crate::storage::GraphStore;
use crate::url::normalize_url;
use crate::NestError;
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    store: Arc<dyn GraphStore>,
    frontier: Arc<Frontier>,
    token: CancellationToken,
}

impl Coordinator {
    /// Creates a coordinator with an empty frontier
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `store` - The graph store every spider persists into
    pub fn new(config: Config, store: Arc<dyn GraphStore>) -> Self {
        let frontier = Arc::new(Frontier::new(config.crawler.frontier_capacity));
        Self {
            config,
            store,
            frontier,
            token: CancellationToken::new(),
        }
    }

    /// A token that stops the crawl early when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Runs a crawl from `target` for the configured window
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The window closed (or the token was cancelled)
    /// * `Err(NestError)` - The target is not a crawlable URL, or a spider hit
    ///   a fatal error
    pub async fn run(&self, target: &str) -> crate::Result<CrawlReport> {
        let seed_url = normalize_url(target, target)?;
        self.frontier.enqueue(Page::seed(seed_url.clone()));

        let client = build_http_client(&self.config)?;
        let analyzer = if self.config.analyzer.enabled {
            Some(AnalyzerClient::new(client.clone(), &self.config.analyzer.url))
        } else {
            None
        };
        let limits = LinkLimits::from(&self.config.crawler);

        tracing::info!(
            "Crawling from {} with {} spiders for {:?}",
            seed_url,
            self.config.crawler.spider_count,
            self.config.crawler.crawl_time()
        );

        let mut spiders = JoinSet::new();
        for n in 1..=self.config.crawler.spider_count {
            let spider = Spider::new(
                format!("spider-{}", n),
                Arc::clone(&self.frontier),
                Arc::clone(&self.store),
                client.clone(),
                analyzer.clone(),
                limits,
                self.config.crawler.max_depth,
                self.token.clone(),
            );
            let span = tracing::info_span!("spider", spider = %spider.label());
            spiders.spawn(spider.run().instrument(span));
        }

        let window = tokio::time::sleep(self.config.crawler.crawl_time());
        tokio::pin!(window);

        let mut crawled = 0;
        loop {
            tokio::select! {
                _ = &mut window => {
                    tracing::info!("Crawl window elapsed");
                    break;
                }
                _ = self.token.cancelled() => {
                    tracing::info!("Crawl cancelled");
                    break;
                }
                joined = spiders.join_next() => match joined {
                    Some(result) => match flatten(result) {
                        Ok(count) => crawled += count,
                        Err(e) => {
                            self.token.cancel();
                            spiders.shutdown().await;
                            return Err(e);
                        }
                    },
                    // No spiders configured or all exited early
                    None => break,
                },
            }
        }

        self.token.cancel();
        while let Some(result) = spiders.join_next().await {
            crawled += flatten(result)?;
        }

        tracing::info!(
            "Crawl finished: {} pages crawled, {} claimed, {} still queued",
            crawled,
            self.frontier.claimed_count(),
            self.frontier.len()
        );

        Ok(CrawlReport::from_snapshot(&self.frontier.snapshot()))
    }
}

fn flatten(result: Result<Result<usize, NestError>, JoinError>) -> crate::Result<usize> {
    result.map_err(|e| NestError::Worker(e.to_string()))?
}

/// Runs a complete crawl with a fresh coordinator
///
/// This is the main entry point for starting a crawl.
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `store` - The graph store, already reset by the caller
/// * `target` - The seed URL
pub async fn run_crawl(
    config: Config,
    store: Arc<dyn GraphStore>,
    target: &str,
) -> crate::Result<CrawlReport> {
    Coordinator::new(config, store).run(target).await
}
