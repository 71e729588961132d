//! Configuration module for Sumi-Scribe
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_scribe::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Minimum post depth: {}", config.scraper.min_path_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ExtractorConfig, OutputConfig, ScraperConfig, WorkerConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};

use crate::crawler::WorkerSettings;
use crate::extract::{ContentExtractor, DateLocale};
use crate::url::UrlClassifier;
use crate::ConfigError;
use std::time::Duration;

impl Config {
    /// Checks the configuration, e.g. after command-line overrides were applied
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate(self)
    }

    /// Classifier using the configured minimum path depth
    pub fn classifier(&self) -> UrlClassifier {
        UrlClassifier::new(self.scraper.min_path_depth)
    }

    /// Extractor using the configured month names, or the Indonesian defaults
    pub fn extractor(&self) -> Result<ContentExtractor, ConfigError> {
        let locale = match &self.extractor.month_names {
            Some(months) => DateLocale::new(months.as_slice())
                .map_err(|e| ConfigError::InvalidPattern(format!("Invalid month names: {}", e)))?,
            None => DateLocale::default(),
        };
        Ok(ContentExtractor::new(locale))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.scraper.timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.scraper.request_delay_ms)
    }

    /// Worker scheduling derived from the scraper and worker tables
    pub fn worker_settings(&self) -> WorkerSettings {
        WorkerSettings {
            request_delay: self.request_delay(),
            cycle_delay: Duration::from_secs(self.worker.cycle_delay_secs),
            continuous: self.worker.enabled,
            max_articles: self.scraper.max_articles,
            url_filter: self.scraper.url_filter.clone(),
        }
    }
}
