//! Main content location and extraction

use crate::article::ExtractedContent;
use crate::extract::blocks::{collect_blocks, render_html, segment_sections};
use crate::extract::{class_contains, element_text, select_first};
use scraper::{ElementRef, Html, Selector};

/// Known CMS and theme content wrappers, in priority order
pub const CONTENT_SELECTORS: &[&str] = &[
    "div.elementor-widget-theme-post-content",
    "div.entry-content",
    "div.post-content",
    "div.article-content",
    "div.td-post-content",
    "div.blog-post-content",
    "div.single-post-content",
];

/// Class keywords that disqualify a fuzzy "content" container
pub const EXCLUDED_CLASS_KEYWORDS: &[&str] = &[
    "toc",
    "table-of-contents",
    "widget",
    "sidebar",
    "menu",
    "nav",
    "header",
    "footer",
    "related",
    "comment",
];

/// Finds the element holding the article body
///
/// Tried in order: the known CMS wrappers, the `<article>` with the most text (the
/// first one wins a tie), the first `<div>` whose class mentions "content" without
/// an excluded keyword, then `<main>`, then `<body>`.
pub fn locate_content(document: &Html) -> Option<ElementRef<'_>> {
    let root = document.root_element();

    for css in CONTENT_SELECTORS {
        if let Some(element) = select_first(root, css) {
            tracing::debug!("Content located with {}", css);
            return Some(element);
        }
    }

    if let Some(article) = largest_article(root) {
        return Some(article);
    }

    if let Some(container) = fuzzy_content_div(root) {
        return Some(container);
    }

    select_first(root, "main").or_else(|| select_first(root, "body"))
}

fn largest_article(root: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("article").ok()?;
    let mut best: Option<(usize, ElementRef<'_>)> = None;

    for article in root.select(&selector) {
        let length: usize = article.text().map(|t| t.chars().count()).sum();
        if best.map_or(true, |(max, _)| length > max) {
            best = Some((length, article));
        }
    }

    best.map(|(_, article)| article)
}

fn fuzzy_content_div(root: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let selector = Selector::parse("div[class]").ok()?;
    root.select(&selector).find(|div| {
        class_contains(*div, "content")
            && !EXCLUDED_CLASS_KEYWORDS
                .iter()
                .any(|keyword| class_contains(*div, keyword))
    })
}

/// Extracts the title, cleaned markup and sections from a document
pub fn extract_content(document: &Html) -> ExtractedContent {
    let root = document.root_element();
    let title = select_first(root, "h1")
        .map(element_text)
        .unwrap_or_default();

    let Some(container) = locate_content(document) else {
        return ExtractedContent {
            title,
            ..Default::default()
        };
    };

    let blocks = collect_blocks(container);
    ExtractedContent {
        title,
        content_html: render_html(&blocks),
        sections: segment_sections(&blocks),
    }
}
