use crate::output::OutputFormat;
use serde::Deserialize;

/// Main configuration structure for Sumi-Scribe
///
/// Every table is optional; a file holding only `urls` is valid.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Article URLs, sitemap URLs (`.xml`) or site roots to scrape
    #[serde(default)]
    pub urls: Vec<String>,

    #[serde(default)]
    pub scraper: ScraperConfig,

    #[serde(default)]
    pub extractor: ExtractorConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub worker: WorkerConfig,
}

/// Fetching and URL selection
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Minimum path depth for a URL to count as a single post
    #[serde(rename = "min-path-depth")]
    pub min_path_depth: usize,

    /// Request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Pause between requests (milliseconds)
    #[serde(rename = "request-delay-ms")]
    pub request_delay_ms: u64,

    /// Maximum articles scraped from one sitemap
    #[serde(rename = "max-articles")]
    pub max_articles: Option<usize>,

    /// Regex that sitemap URLs must match
    #[serde(rename = "url-filter")]
    pub url_filter: Option<String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            min_path_depth: crate::url::DEFAULT_MIN_PATH_DEPTH,
            timeout_secs: 30,
            request_delay_ms: 1000,
            max_articles: Some(10),
            url_filter: None,
        }
    }
}

/// Content extraction
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Month names for publish-date detection, January first
    #[serde(rename = "month-names")]
    pub month_names: Option<Vec<String>>,
}

/// Where and how articles are saved
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Directory receiving article files
    pub directory: String,

    /// Path to the SQLite scrape history
    #[serde(rename = "history-path")]
    pub history_path: String,

    /// Skip URLs already in the history
    #[serde(rename = "prevent-duplicates")]
    pub prevent_duplicates: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            directory: "output".to_string(),
            history_path: "scraped_history.db".to_string(),
            prevent_duplicates: true,
        }
    }
}

/// Continuous per-domain workers
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Repeat cycles until interrupted instead of running once
    pub enabled: bool,

    /// Pause between cycles in seconds
    #[serde(rename = "cycle-delay-secs")]
    pub cycle_delay_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cycle_delay_secs: 3600,
        }
    }
}
