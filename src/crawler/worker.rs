//! Per-domain workers
//!
//! Configured URLs are grouped by host and each host gets its own tokio task. A
//! worker walks its URLs in order every cycle, saving each scraped article and marking
//! it in the shared history. Shutdown is cooperative: workers watch a channel and stop
//! between pulls.

use crate::article::ArticleRecord;
use crate::crawler::{ArticleScraper, PageFetcher, SitemapScrapeOptions};
use crate::output::{ArticleSink, ScrapeStats};
use crate::sitemap::discover_sitemap;
use crate::storage::HistoryStore;
use crate::url::{extract_domain, group_by_domain, is_sitemap_url, parse_http_url};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;

/// Scheduling settings shared by every worker
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Pause between URLs and between sitemap articles
    pub request_delay: Duration,

    /// Pause between cycles in continuous mode
    pub cycle_delay: Duration,

    /// Repeat cycles until shutdown instead of running once
    pub continuous: bool,

    /// Cap on articles per sitemap
    pub max_articles: Option<usize>,

    /// Regex applied to sitemap URLs
    pub url_filter: Option<String>,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_secs(1),
            cycle_delay: Duration::from_secs(3600),
            continuous: false,
            max_articles: None,
            url_filter: None,
        }
    }
}

/// Collaborators shared by all workers
pub struct WorkerContext<F: PageFetcher> {
    pub scraper: Arc<ArticleScraper<F>>,
    pub sink: Arc<dyn ArticleSink>,
    pub history: Option<Arc<dyn HistoryStore>>,
    pub settings: WorkerSettings,
}

impl<F: PageFetcher> Clone for WorkerContext<F> {
    fn clone(&self) -> Self {
        Self {
            scraper: Arc::clone(&self.scraper),
            sink: Arc::clone(&self.sink),
            history: self.history.clone(),
            settings: self.settings.clone(),
        }
    }
}

/// Worker processing every configured URL of one host
pub struct DomainWorker<F: PageFetcher> {
    domain: String,
    urls: Vec<String>,
    context: WorkerContext<F>,
    shutdown: watch::Receiver<bool>,
}

impl<F: PageFetcher> DomainWorker<F> {
    pub fn new(
        domain: String,
        urls: Vec<String>,
        context: WorkerContext<F>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            domain,
            urls,
            context,
            shutdown,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    fn stopping(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Sleeps for `duration`, returning early on shutdown
    async fn pause(&mut self, duration: Duration) {
        if duration.is_zero() || self.stopping() {
            return;
        }

        let sleep = tokio::time::sleep(duration);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = &mut sleep => return,
                changed = self.shutdown.changed() => {
                    if changed.is_err() {
                        // Sender dropped, no shutdown can arrive
                        (&mut sleep).await;
                        return;
                    }
                    if self.stopping() {
                        return;
                    }
                }
            }
        }
    }

    /// Runs cycles until shutdown, or once when not continuous
    ///
    /// # Returns
    ///
    /// Counters summed over every cycle
    pub async fn run(mut self) -> ScrapeStats {
        tracing::info!(
            "[{}] Worker started with {} URL(s)",
            self.domain,
            self.urls.len()
        );

        let mut totals = ScrapeStats::default();
        let mut cycle = 0u64;
        loop {
            cycle += 1;
            tracing::info!("[{}] Starting cycle {}", self.domain, cycle);

            let stats = self.run_cycle().await;
            stats.log_summary(&format!("[{}] Cycle {} complete", self.domain, cycle));
            totals += stats;

            if !self.context.settings.continuous || self.stopping() {
                break;
            }

            tracing::info!(
                "[{}] Sleeping {:?} before the next cycle",
                self.domain,
                self.context.settings.cycle_delay
            );
            let cycle_delay = self.context.settings.cycle_delay;
            self.pause(cycle_delay).await;
            if self.stopping() {
                break;
            }
        }

        tracing::info!("[{}] Worker stopped", self.domain);
        totals
    }

    /// Processes every URL once
    pub async fn run_cycle(&mut self) -> ScrapeStats {
        let mut stats = ScrapeStats::default();
        let urls = self.urls.clone();

        for (i, url) in urls.iter().enumerate() {
            if self.stopping() {
                break;
            }
            if i > 0 {
                let delay = self.context.settings.request_delay;
                self.pause(delay).await;
            }

            if self.already_seen(url) {
                tracing::info!("[{}] Skip (already scraped): {}", self.domain, url);
                stats.skipped += 1;
                continue;
            }

            if is_sitemap_url(url) {
                tracing::info!("[{}] Processing direct sitemap: {}", self.domain, url);
                self.scrape_sitemap(url, &mut stats).await;
            } else if self.context.scraper.classifier().is_domain_root(url) {
                tracing::info!("[{}] Discovering sitemap for {}", self.domain, url);
                match discover_sitemap(self.context.scraper.fetcher(), url).await {
                    Some(sitemap_url) => self.scrape_sitemap(&sitemap_url, &mut stats).await,
                    None => tracing::warn!("[{}] No sitemap found for {}", self.domain, url),
                }
            } else {
                let outcome = self.context.scraper.scrape(url, false).await;
                outcome.count_into(&mut stats);
                if let Some(article) = outcome.into_article() {
                    self.save(&article, &mut stats);
                }
            }
        }

        stats
    }

    /// Scrapes `sitemap_url` as a sitemap whatever its suffix
    pub async fn run_sitemap(&self, sitemap_url: &str) -> ScrapeStats {
        tracing::info!("[{}] Processing sitemap: {}", self.domain, sitemap_url);
        let mut stats = ScrapeStats::default();
        self.scrape_sitemap(sitemap_url, &mut stats).await;
        stats.log_summary(&format!("[{}] Sitemap complete", self.domain));
        stats
    }

    async fn scrape_sitemap(&self, sitemap_url: &str, stats: &mut ScrapeStats) {
        let options = SitemapScrapeOptions {
            url_filter: self.context.settings.url_filter.clone(),
            max_articles: self.context.settings.max_articles,
            delay: self.context.settings.request_delay,
        };
        let mut scrape = match self.context.scraper.from_sitemap(sitemap_url, options) {
            Ok(scrape) => scrape,
            Err(e) => {
                tracing::error!("[{}] Invalid URL filter: {}", self.domain, e);
                return;
            }
        };

        while !self.stopping() {
            let Some(article) = scrape.next_article().await else {
                break;
            };
            self.save(&article, stats);
        }

        *stats += scrape.stats();
    }

    fn already_seen(&self, url: &str) -> bool {
        let Some(history) = &self.context.history else {
            return false;
        };
        match history.seen(url) {
            Ok(seen) => seen,
            Err(e) => {
                tracing::warn!("[{}] History lookup failed for {}: {}", self.domain, url, e);
                false
            }
        }
    }

    fn save(&self, article: &ArticleRecord, stats: &mut ScrapeStats) {
        match self.context.sink.save(article) {
            Ok(location) => {
                tracing::debug!("[{}] Saved {} to {}", self.domain, article.url, location);
                stats.saved += 1;
                if let Some(history) = &self.context.history {
                    if let Err(e) = history.mark_seen(&article.url, &article.title) {
                        tracing::warn!("[{}] Could not record {}: {}", self.domain, article.url, e);
                    }
                }
            }
            Err(e) => {
                tracing::error!("[{}] Failed to save {}: {}", self.domain, article.url, e);
                stats.save_errors += 1;
            }
        }
    }
}

/// Spawns and supervises one [`DomainWorker`] per host
pub struct WorkerManager<F: PageFetcher> {
    context: WorkerContext<F>,
    shutdown_tx: watch::Sender<bool>,
}

impl<F: PageFetcher + 'static> WorkerManager<F> {
    pub fn new(context: WorkerContext<F>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            context,
            shutdown_tx,
        }
    }

    /// Sender that stops every worker when `true` is sent
    pub fn shutdown_handle(&self) -> watch::Sender<bool> {
        self.shutdown_tx.clone()
    }

    /// Signals every worker to stop after its current pull
    pub fn stop(&self) {
        self.shutdown_tx.send_replace(true);
    }

    /// Runs one worker per host until they all finish
    ///
    /// # Arguments
    ///
    /// * `urls` - Configured URLs; invalid ones are logged and dropped
    ///
    /// # Returns
    ///
    /// Counters summed over every worker
    pub async fn run(&self, urls: &[String]) -> ScrapeStats {
        let groups = group_by_domain(urls);
        tracing::info!("Starting {} worker(s)", groups.len());

        let mut workers = JoinSet::new();
        for (domain, domain_urls) in groups {
            let worker = DomainWorker::new(
                domain,
                domain_urls,
                self.context.clone(),
                self.shutdown_tx.subscribe(),
            );
            workers.spawn(worker.run());
        }

        let mut totals = ScrapeStats::default();
        while let Some(result) = workers.join_next().await {
            match result {
                Ok(stats) => totals += stats,
                Err(e) => tracing::error!("Worker task failed: {}", e),
            }
        }

        tracing::info!("All workers stopped");
        totals
    }

    /// Scrapes one explicitly given sitemap with a single worker
    ///
    /// The URL is not routed, so sitemaps served from URLs such as
    /// `/index.php?sitemap=posts` are traversed too.
    pub async fn run_sitemap(&self, sitemap_url: &str) -> ScrapeStats {
        let domain = parse_http_url(sitemap_url)
            .ok()
            .and_then(|url| extract_domain(&url))
            .unwrap_or_else(|| sitemap_url.to_string());
        let worker = DomainWorker::new(
            domain,
            vec![sitemap_url.to_string()],
            self.context.clone(),
            self.shutdown_tx.subscribe(),
        );
        worker.run_sitemap(sitemap_url).await
    }

    /// Runs the workers, stopping them on Ctrl-C
    pub async fn run_until_ctrl_c(&self, urls: &[String]) -> ScrapeStats {
        self.until_ctrl_c(self.run(urls)).await
    }

    /// Scrapes one sitemap, stopping on Ctrl-C
    pub async fn run_sitemap_until_ctrl_c(&self, sitemap_url: &str) -> ScrapeStats {
        self.until_ctrl_c(self.run_sitemap(sitemap_url)).await
    }

    async fn until_ctrl_c<T>(&self, work: impl Future<Output = T>) -> T {
        let shutdown = self.shutdown_handle();
        let signal_task = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received. Stopping workers...");
                shutdown.send_replace(true);
            }
        });

        let result = work.await;
        signal_task.abort();
        result
    }
}
