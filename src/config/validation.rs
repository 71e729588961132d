use crate::config::types::{Config, ExtractorConfig, OutputConfig, ScraperConfig, WorkerConfig};
use crate::ConfigError;
use regex::Regex;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_urls(&config.urls)?;
    validate_scraper_config(&config.scraper)?;
    validate_extractor_config(&config.extractor)?;
    validate_output_config(&config.output)?;
    validate_worker_config(&config.worker)?;
    Ok(())
}

/// Validates the configured URLs
fn validate_urls(urls: &[String]) -> Result<(), ConfigError> {
    for raw in urls {
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid URL '{}': {}", raw, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "URL '{}' must use http or https",
                raw
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!("URL '{}' has no host", raw)));
        }
    }
    Ok(())
}

/// Validates scraper configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    if config.min_path_depth < 1 {
        return Err(ConfigError::Validation(
            "min-path-depth must be >= 1".to_string(),
        ));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 600, got {}",
            config.timeout_secs
        )));
    }

    if config.max_articles == Some(0) {
        return Err(ConfigError::Validation(
            "max-articles must be >= 1 when set".to_string(),
        ));
    }

    if let Some(filter) = &config.url_filter {
        Regex::new(filter).map_err(|e| {
            ConfigError::InvalidPattern(format!("Invalid url-filter '{}': {}", filter, e))
        })?;
    }

    Ok(())
}

/// Validates extractor configuration
fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    let Some(months) = &config.month_names else {
        return Ok(());
    };

    if months.len() != 12 {
        return Err(ConfigError::Validation(format!(
            "month-names must list exactly 12 months, got {}",
            months.len()
        )));
    }

    if months.iter().any(|m| m.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "month-names cannot contain empty names".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.prevent_duplicates && config.history_path.is_empty() {
        return Err(ConfigError::Validation(
            "history-path cannot be empty when prevent-duplicates is set".to_string(),
        ));
    }

    Ok(())
}

/// Validates worker configuration
fn validate_worker_config(config: &WorkerConfig) -> Result<(), ConfigError> {
    if config.enabled && config.cycle_delay_secs == 0 {
        return Err(ConfigError::Validation(
            "cycle-delay-secs must be >= 1 when workers are enabled".to_string(),
        ));
    }
    Ok(())
}
