//! Article records and their assembly from extracted parts
//!
//! An [`ArticleRecord`] is created once per successfully extracted page and handed to
//! the caller; nothing in this crate mutates it afterwards.

mod assembler;

pub use assembler::{assemble, AssemblyError, MIN_CONTENT_LENGTH};

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Default for author, date and category when nothing was found on the page
pub const UNKNOWN: &str = "Unknown";

/// A logical section of article content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentSection {
    /// Section heading; empty for the introduction
    #[serde(serialize_with = "empty_as_null")]
    pub heading: String,

    /// Plain-text body
    #[serde(rename = "content")]
    pub body: String,

    /// 0 for the introduction, otherwise the heading level
    pub level: u8,
}

impl ContentSection {
    /// Creates the introduction section
    pub fn introduction(body: impl Into<String>) -> Self {
        Self {
            heading: String::new(),
            body: body.into(),
            level: 0,
        }
    }

    /// Returns true for the leading introduction section
    pub fn is_introduction(&self) -> bool {
        self.level == 0
    }
}

/// A fully extracted article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleRecord {
    pub url: String,
    pub title: String,
    pub author: String,
    pub publish_date: String,
    pub category: String,
    pub meta_description: String,

    /// Cleaned, whitelisted markup
    #[serde(rename = "content")]
    pub content_html: String,

    pub sections: Vec<ContentSection>,

    /// Deduplicated tags in sorted order
    pub tags: Vec<String>,

    pub scraped_at: DateTime<Utc>,
}

/// Open Graph and meta description values from the document head
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub og_title: String,
    pub og_image: String,
    pub description: String,
}

/// Byline information found in the page body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleInfo {
    pub author: String,
    pub category: String,
    pub date: String,
}

impl Default for ArticleInfo {
    fn default() -> Self {
        Self {
            author: UNKNOWN.to_string(),
            category: UNKNOWN.to_string(),
            date: UNKNOWN.to_string(),
        }
    }
}

/// Title and body extracted from the main content region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Text of the first `<h1>`; empty when the page has none
    pub title: String,
    pub content_html: String,
    pub sections: Vec<ContentSection>,
}

fn empty_as_null<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_empty() {
        serializer.serialize_none()
    } else {
        serializer.serialize_str(value)
    }
}
