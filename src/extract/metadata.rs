//! Head metadata, byline and publish-date extraction

use crate::article::{ArticleInfo, PageMeta};
use crate::extract::{class_contains, element_text, has_rel, select_first};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Indonesian month names, January first
pub const INDONESIAN_MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Month names used to recognize a `Month D, YYYY` publish date
#[derive(Debug, Clone)]
pub struct DateLocale {
    month_names: Vec<String>,
    pattern: Regex,
}

impl DateLocale {
    /// Builds a locale from month names; names are matched literally
    pub fn new<S: AsRef<str>>(month_names: &[S]) -> Result<Self, regex::Error> {
        let alternatives = month_names
            .iter()
            .map(|name| regex::escape(name.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?:{})\s+\d{{1,2}},\s+\d{{4}}", alternatives))?;

        Ok(Self {
            month_names: month_names.iter().map(|n| n.as_ref().to_string()).collect(),
            pattern,
        })
    }

    pub fn month_names(&self) -> &[String] {
        &self.month_names
    }

    /// First date in `text`, if any
    pub fn find_date<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern.find(text).map(|m| m.as_str())
    }
}

impl Default for DateLocale {
    fn default() -> Self {
        Self::new(&INDONESIAN_MONTHS).expect("escaped month names form a valid pattern")
    }
}

fn meta_content(document: &Html, css: &str) -> String {
    select_first(document.root_element(), css)
        .and_then(|meta| meta.value().attr("content"))
        .unwrap_or_default()
        .to_string()
}

/// Reads the Open Graph title and image and the meta description
pub fn extract_meta(document: &Html) -> PageMeta {
    PageMeta {
        og_title: meta_content(document, r#"meta[property="og:title"]"#),
        og_image: meta_content(document, r#"meta[property="og:image"]"#),
        description: meta_content(document, r#"meta[name="description"]"#),
    }
}

/// Finds author, category and publish date; missing values stay "Unknown"
pub fn extract_article_info(document: &Html, locale: &DateLocale) -> ArticleInfo {
    let mut info = ArticleInfo::default();
    let Ok(anchors) = Selector::parse("a") else {
        return info;
    };
    let anchors: Vec<ElementRef<'_>> = document.select(&anchors).collect();

    if let Some(author) = anchors.iter().find(|a| class_contains(**a, "author")) {
        info.author = element_text(*author);
    }

    let category = anchors
        .iter()
        .find(|a| has_rel(**a, "category tag"))
        .or_else(|| anchors.iter().find(|a| class_contains(**a, "category")));
    if let Some(category) = category {
        info.category = element_text(*category);
    }

    let page_text: String = document.root_element().text().collect();
    if let Some(date) = locale.find_date(&page_text) {
        info.date = date.to_string();
    }

    info
}
