//! Content extraction module for Sumi-Scribe
//!
//! This module turns a parsed HTML document into the parts of an article:
//! - Open Graph and description metadata from the head
//! - Author, category and publish date from the page body
//! - Tags gathered by several independent strategies
//! - The main content region, re-serialized as minimal markup and split into sections
//!
//! `scraper::Html` is not `Send`, so every function here is synchronous and the
//! document never lives across an `.await`.

mod blocks;
mod content;
mod metadata;
mod tags;

pub use blocks::{collect_blocks, render_html, segment_sections, Block};
pub use content::{extract_content, locate_content, CONTENT_SELECTORS, EXCLUDED_CLASS_KEYWORDS};
pub use metadata::{extract_article_info, extract_meta, DateLocale, INDONESIAN_MONTHS};
pub use tags::extract_tags;

use crate::article::{ArticleInfo, ExtractedContent, PageMeta};
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;

/// Everything extracted from one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPage {
    pub meta: PageMeta,
    pub info: ArticleInfo,
    pub content: ExtractedContent,
    pub tags: BTreeSet<String>,
}

/// Extracts article parts from HTML documents
///
/// The extractor is stateless apart from its date locale and can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct ContentExtractor {
    locale: DateLocale,
}

impl ContentExtractor {
    /// Creates an extractor recognizing dates in `locale`
    pub fn new(locale: DateLocale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> &DateLocale {
        &self.locale
    }

    pub fn extract_meta(&self, document: &Html) -> PageMeta {
        extract_meta(document)
    }

    pub fn extract_article_info(&self, document: &Html) -> ArticleInfo {
        extract_article_info(document, &self.locale)
    }

    pub fn extract_tags(&self, document: &Html) -> BTreeSet<String> {
        extract_tags(document)
    }

    pub fn extract_content(&self, document: &Html) -> ExtractedContent {
        extract_content(document)
    }

    /// Parses `html` and runs every extraction over it
    ///
    /// # Example
    ///
    /// ```
    /// use sumi_scribe::extract::ContentExtractor;
    ///
    /// let page = ContentExtractor::default()
    ///     .extract_page("<html><body><h1>Hello</h1><p>World</p></body></html>");
    /// assert_eq!(page.content.title, "Hello");
    /// assert_eq!(page.info.author, "Unknown");
    /// ```
    pub fn extract_page(&self, html: &str) -> ExtractedPage {
        let document = Html::parse_document(html);
        ExtractedPage {
            meta: self.extract_meta(&document),
            info: self.extract_article_info(&document),
            content: self.extract_content(&document),
            tags: self.extract_tags(&document),
        }
    }
}

/// Text content with whitespace runs collapsed to single spaces
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    let raw: String = element.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First descendant of `root` matching `css`
pub(crate) fn select_first<'a>(root: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    root.select(&selector).next()
}

/// Case-insensitive substring test on the class attribute
pub(crate) fn class_contains(element: ElementRef<'_>, needle: &str) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|class| class.to_lowercase().contains(needle))
}

/// Tests the `rel` attribute
///
/// A single-word `value` matches any token of the attribute; a multi-word `value`
/// must equal the whole attribute up to whitespace.
pub(crate) fn has_rel(element: ElementRef<'_>, value: &str) -> bool {
    let Some(rel) = element.value().attr("rel") else {
        return false;
    };
    let mut tokens = rel.split_whitespace();
    if value.contains(' ') {
        tokens.eq(value.split_whitespace())
    } else {
        tokens.any(|token| token.eq_ignore_ascii_case(value))
    }
}
