//! Output module for persisting scraped articles
//!
//! This module handles:
//! - Rendering an [`ArticleRecord`](crate::article::ArticleRecord) as JSON, plain text
//!   or Markdown
//! - Writing rendered articles to uniquely named files
//! - Counting scrape outcomes and printing history statistics

mod file_sink;
mod render;
mod stats;
mod traits;

pub use file_sink::{safe_title, FileSink};
pub use render::{render, render_json, render_markdown, render_text};
pub use stats::{print_history_stats, ScrapeStats};
pub use traits::{ArticleSink, OutputError, OutputResult};

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// File format for saved articles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum OutputFormat {
    #[default]
    #[serde(rename = "json")]
    Json,

    #[serde(rename = "txt", alias = "text")]
    Text,

    #[serde(rename = "md", alias = "markdown")]
    Markdown,
}

impl OutputFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
            Self::Markdown => "md",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = OutputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "txt" | "text" => Ok(Self::Text),
            "md" | "markdown" => Ok(Self::Markdown),
            other => Err(OutputError::UnknownFormat(other.to_string())),
        }
    }
}
