//! Spider-Nest main entry point
//!
//! This is the command-line interface for the Spider-Nest crawler.

use anyhow::Context;
use clap::Parser;
use spider_nest::config::{load_config_or_default, Config};
use spider_nest::crawler::run_crawl;
use spider_nest::output::{load_statistics, log_statistics, print_report};
use spider_nest::storage::{open_store, GraphStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Spider-Nest: a concurrent, depth-bounded web crawler
///
/// Starting from TARGET_URL, a pool of spiders crawls for a fixed window,
/// storing every crawled page and its links in a SQLite graph, then prints
/// the crawled pages.
#[derive(Parser, Debug)]
#[command(name = "spider-nest")]
#[command(version)]
#[command(about = "A concurrent, depth-bounded web crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "TARGET_URL")]
    target: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_config_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Invalid default configuration".to_string(),
    })?;

    let store = prepare_store(&config)?;

    let report = run_crawl(config, Arc::clone(&store), &cli.target)
        .await
        .context("Crawl failed")?;

    print_report(&report);

    let stats = load_statistics(store.as_ref()).context("Failed to read graph statistics")?;
    log_statistics(&stats);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("spider_nest=info,warn"),
            1 => EnvFilter::new("spider_nest=debug,info"),
            2 => EnvFilter::new("spider_nest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Opens the graph store and wipes it for the new run
fn prepare_store(config: &Config) -> anyhow::Result<Arc<dyn GraphStore>> {
    let path = Path::new(&config.storage.database_path);
    tracing::info!("Opening graph store at {}", path.display());

    let store = open_store(path)
        .with_context(|| format!("Failed to open graph store at {}", path.display()))?;
    store.reset().context("Failed to reset graph store")?;

    Ok(Arc::new(store))
}
