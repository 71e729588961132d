//! Tag extraction

use crate::extract::{class_contains, element_text, has_rel};
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeSet;

/// Tags found inside tag containers must be shorter than this, in characters
const MAX_CONTAINER_TAG_LENGTH: usize = 50;

/// Collects tags from keyword meta, `article:tag` meta, `rel="tag"` anchors and
/// anchors inside elements whose class mentions "tag"
pub fn extract_tags(document: &Html) -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    let root = document.root_element();
    let mut add = |tag: &str| {
        let tag = tag.trim();
        if !tag.is_empty() {
            tags.insert(tag.to_string());
        }
    };

    if let Ok(selector) = Selector::parse(r#"meta[name="keywords"]"#) {
        if let Some(content) = root
            .select(&selector)
            .next()
            .and_then(|meta| meta.value().attr("content"))
        {
            content.split(',').for_each(&mut add);
        }
    }

    if let Ok(selector) = Selector::parse(r#"meta[property="article:tag"]"#) {
        for meta in root.select(&selector) {
            if let Some(content) = meta.value().attr("content") {
                add(content);
            }
        }
    }

    if let Ok(selector) = Selector::parse("a") {
        for anchor in root.select(&selector).filter(|a| has_rel(*a, "tag")) {
            add(&element_text(anchor));
        }
    }

    if let Ok(selector) = Selector::parse("div[class], span[class], ul[class]") {
        for container in root.select(&selector).filter(|c| class_contains(*c, "tag")) {
            for anchor in container
                .descendants()
                .filter_map(ElementRef::wrap)
                .filter(|e| e.value().name() == "a")
            {
                let text = element_text(anchor);
                if text.chars().count() < MAX_CONTAINER_TAG_LENGTH {
                    add(&text);
                }
            }
        }
    }

    tags
}
