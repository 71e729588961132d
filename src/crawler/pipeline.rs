//! Scrape pipeline
//!
//! Ties the pieces together for one URL (classify, fetch, extract, assemble) and for a
//! whole sitemap through the lazy [`SitemapScrape`] cursor.

use crate::article::{assemble, ArticleRecord};
use crate::crawler::{HttpFetcher, PageFetcher};
use crate::extract::ContentExtractor;
use crate::output::ScrapeStats;
use crate::sitemap::{traverse, SitemapTraverser};
use crate::storage::HistoryStore;
use crate::url::UrlClassifier;
use std::sync::Arc;
use std::time::Duration;

/// What happened to one URL
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeOutcome {
    /// An article was extracted
    Article(Box<ArticleRecord>),

    /// The URL was not fetched (not a single post, or already scraped)
    Skipped { reason: String },

    /// The page could not be fetched
    FetchFailed { error: String },

    /// The page was fetched but did not yield enough content
    Rejected { reason: String },
}

impl ScrapeOutcome {
    /// The article, if one was produced
    pub fn into_article(self) -> Option<ArticleRecord> {
        match self {
            Self::Article(article) => Some(*article),
            _ => None,
        }
    }

    /// Adds this outcome to `stats`; articles are counted by whoever saves them
    pub fn count_into(&self, stats: &mut ScrapeStats) {
        match self {
            Self::Article(_) => {}
            Self::Skipped { .. } => stats.skipped += 1,
            Self::FetchFailed { .. } => stats.fetch_failures += 1,
            Self::Rejected { .. } => stats.rejected += 1,
        }
    }
}

/// Options for scraping a sitemap
#[derive(Debug, Clone, Default)]
pub struct SitemapScrapeOptions {
    /// Regex that sitemap URLs must match
    pub url_filter: Option<String>,

    /// Stop after this many single-post URLs have been scraped
    pub max_articles: Option<usize>,

    /// Pause before each fetch after the first
    pub delay: Duration,
}

/// Scrapes articles from single URLs or whole sitemaps
pub struct ArticleScraper<F: PageFetcher = HttpFetcher> {
    fetcher: F,
    classifier: UrlClassifier,
    extractor: ContentExtractor,
    history: Option<Arc<dyn HistoryStore>>,
}

impl<F: PageFetcher> ArticleScraper<F> {
    /// Creates a scraper with the default classifier and extractor and no history
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            classifier: UrlClassifier::default(),
            extractor: ContentExtractor::default(),
            history: None,
        }
    }

    pub fn with_classifier(mut self, classifier: UrlClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_extractor(mut self, extractor: ContentExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// URLs already in `history` are skipped without being fetched
    pub fn with_history(mut self, history: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn classifier(&self) -> &UrlClassifier {
        &self.classifier
    }

    fn already_seen(&self, url: &str) -> bool {
        let Some(history) = &self.history else {
            return false;
        };
        match history.seen(url) {
            Ok(seen) => seen,
            Err(e) => {
                tracing::warn!("History lookup failed for {}: {}", url, e);
                false
            }
        }
    }

    /// Scrapes one URL
    ///
    /// With `validate_url` set, URLs the classifier does not accept as single posts
    /// are skipped without a fetch.
    ///
    /// # Arguments
    ///
    /// * `url` - The page to scrape
    /// * `validate_url` - Whether to classify the URL first
    ///
    /// # Returns
    ///
    /// The outcome; failures are values, never errors
    pub async fn scrape(&self, url: &str, validate_url: bool) -> ScrapeOutcome {
        if validate_url {
            let classification = self.classifier.classify(url);
            if !classification.is_valid {
                tracing::info!("Skip {}: {}", url, classification.reason);
                return ScrapeOutcome::Skipped {
                    reason: classification.reason,
                };
            }
        }

        if self.already_seen(url) {
            tracing::info!("Skip {}: already scraped", url);
            return ScrapeOutcome::Skipped {
                reason: "Already scraped".to_string(),
            };
        }

        tracing::info!("Scraping: {}", url);
        let fetched = self.fetcher.fetch(url).await;
        if let Some(error) = fetched.failure_reason() {
            tracing::error!("Failed to fetch {}: {}", url, error);
            return ScrapeOutcome::FetchFailed { error };
        }
        let Some(body) = fetched.into_body() else {
            return ScrapeOutcome::FetchFailed {
                error: "Empty response".to_string(),
            };
        };

        let page = self.extractor.extract_page(&body);
        match assemble(url, page.meta, page.info, page.content, page.tags) {
            Ok(article) => {
                tracing::info!("Scraped: {}", article.title);
                ScrapeOutcome::Article(Box::new(article))
            }
            Err(e) => {
                tracing::info!("Skip {}: {}", url, e);
                ScrapeOutcome::Rejected {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Starts scraping the articles listed in a sitemap
    ///
    /// When `max_articles` is set, traversal stops after three times that many
    /// sitemap entries. Nothing is fetched until the cursor is pulled.
    ///
    /// # Errors
    ///
    /// Returns an error if `options.url_filter` is not a valid regex.
    pub fn from_sitemap(
        &self,
        sitemap_url: &str,
        options: SitemapScrapeOptions,
    ) -> Result<SitemapScrape<'_, F>, regex::Error> {
        let entry_limit = options.max_articles.map(|max| max.saturating_mul(3));
        let traverser = traverse(
            &self.fetcher,
            sitemap_url,
            options.url_filter.as_deref(),
            entry_limit,
        )?;

        Ok(SitemapScrape {
            scraper: self,
            traverser,
            max_articles: options.max_articles,
            delay: options.delay,
            accepted: 0,
            stats: ScrapeStats::default(),
        })
    }
}

/// Pull-based cursor over the articles of a sitemap
///
/// Each pull advances the sitemap traversal until one accepted URL has been
/// scraped. Dropping the cursor stops the scrape.
pub struct SitemapScrape<'a, F: PageFetcher> {
    scraper: &'a ArticleScraper<F>,
    traverser: SitemapTraverser<'a, F>,
    max_articles: Option<usize>,
    delay: Duration,
    accepted: usize,
    stats: ScrapeStats,
}

impl<'a, F: PageFetcher> SitemapScrape<'a, F> {
    /// Scrapes the next accepted URL and returns its URL and outcome
    ///
    /// URLs the classifier rejects are counted and passed over without a fetch.
    pub async fn next_outcome(&mut self) -> Option<(String, ScrapeOutcome)> {
        loop {
            if self.max_articles.is_some_and(|max| self.accepted >= max) {
                return None;
            }

            let entry = self.traverser.next_entry().await?;
            let classification = self.scraper.classifier.classify(&entry.url);
            if !classification.is_valid {
                tracing::debug!("Skip {}: {}", entry.url, classification.reason);
                self.stats.skipped += 1;
                continue;
            }

            if self.accepted > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.accepted += 1;

            let outcome = self.scraper.scrape(&entry.url, false).await;
            outcome.count_into(&mut self.stats);
            return Some((entry.url, outcome));
        }
    }

    /// Produces the next successfully scraped article
    pub async fn next_article(&mut self) -> Option<ArticleRecord> {
        while let Some((_, outcome)) = self.next_outcome().await {
            if let Some(article) = outcome.into_article() {
                return Some(article);
            }
        }
        None
    }

    /// Counters for the URLs processed so far
    pub fn stats(&self) -> ScrapeStats {
        self.stats
    }

    /// Number of single-post URLs scraped so far
    pub fn accepted(&self) -> usize {
        self.accepted
    }
}
