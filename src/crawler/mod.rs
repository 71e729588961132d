//! Crawler module for fetching and scraping articles
//!
//! This module contains the scraping workflow, including:
//! - HTTP fetching behind the [`PageFetcher`] trait
//! - The per-URL and per-sitemap scrape pipeline
//! - Per-domain workers and their supervision

mod fetcher;
mod pipeline;
mod worker;

pub use fetcher::{build_http_client, FetchResult, HttpFetcher, PageFetcher, BROWSER_USER_AGENT};
pub use pipeline::{ArticleScraper, ScrapeOutcome, SitemapScrape, SitemapScrapeOptions};
pub use worker::{DomainWorker, WorkerContext, WorkerManager, WorkerSettings};

use crate::config::Config;
use crate::output::{FileSink, ScrapeStats};
use crate::storage::{open_history, HistoryStore};
use crate::Result;
use std::path::Path;
use std::sync::Arc;

/// Builds the scraper, sink and history described by `config`
///
/// The history is opened only when `prevent-duplicates` is set.
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(WorkerContext)` - Collaborators ready to hand to a [`WorkerManager`]
/// * `Err(ScribeError)` - The HTTP client, history or output directory could not be set up
pub fn build_context(config: &Config) -> Result<WorkerContext<HttpFetcher>> {
    let fetcher = HttpFetcher::new(config.request_timeout())?;

    let history: Option<Arc<dyn HistoryStore>> = if config.output.prevent_duplicates {
        let history = open_history(Path::new(&config.output.history_path))?;
        Some(Arc::new(history))
    } else {
        None
    };

    let mut scraper = ArticleScraper::new(fetcher)
        .with_classifier(config.classifier())
        .with_extractor(config.extractor()?);
    if let Some(history) = &history {
        scraper = scraper.with_history(Arc::clone(history));
    }

    let sink = FileSink::new(&config.output.directory, config.output.format)?;

    Ok(WorkerContext {
        scraper: Arc::new(scraper),
        sink: Arc::new(sink),
        history,
        settings: config.worker_settings(),
    })
}

/// Runs the configured URLs through per-domain workers
///
/// This is the main entry point for config-driven scraping. It will:
/// 1. Build the HTTP fetcher, history and output sink
/// 2. Spawn one worker per host
/// 3. Run a single cycle, or cycles until Ctrl-C when workers are enabled
///
/// # Arguments
///
/// * `config` - The scraper configuration
///
/// # Returns
///
/// * `Ok(ScrapeStats)` - Counters summed over every worker
/// * `Err(ScribeError)` - Setup failed
pub async fn run_workers(config: &Config) -> Result<ScrapeStats> {
    let context = build_context(config)?;
    let manager = WorkerManager::new(context);
    let stats = manager.run_until_ctrl_c(&config.urls).await;
    stats.log_summary("Run complete");
    Ok(stats)
}
