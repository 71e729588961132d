use crate::article::{ArticleInfo, ArticleRecord, ExtractedContent, PageMeta};
use chrono::Utc;
use std::collections::BTreeSet;
use thiserror::Error;

/// Minimum extracted length, in characters, for a page to count as an article
pub const MIN_CONTENT_LENGTH: usize = 100;

/// Reasons an extracted page is not turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error("Content too short ({length} characters, need {minimum})")]
    ContentTooShort { length: usize, minimum: usize },
}

/// Combines extractor output into a validated article record
///
/// The extracted length is the length of `content_html`, or the summed section body
/// lengths when the markup is empty. Pages under [`MIN_CONTENT_LENGTH`] are rejected.
/// An empty in-page title falls back to the Open Graph title.
pub fn assemble(
    url: &str,
    meta: PageMeta,
    info: ArticleInfo,
    content: ExtractedContent,
    tags: BTreeSet<String>,
) -> Result<ArticleRecord, AssemblyError> {
    let length = extracted_length(&content);
    if length < MIN_CONTENT_LENGTH {
        return Err(AssemblyError::ContentTooShort {
            length,
            minimum: MIN_CONTENT_LENGTH,
        });
    }

    let title = if content.title.is_empty() {
        meta.og_title
    } else {
        content.title
    };

    Ok(ArticleRecord {
        url: url.to_string(),
        title,
        author: info.author,
        publish_date: info.date,
        category: info.category,
        meta_description: meta.description,
        content_html: content.content_html,
        sections: content.sections,
        tags: tags.into_iter().collect(),
        scraped_at: Utc::now(),
    })
}

fn extracted_length(content: &ExtractedContent) -> usize {
    let html_length = content.content_html.chars().count();
    if html_length > 0 {
        return html_length;
    }

    content
        .sections
        .iter()
        .map(|section| section.body.chars().count())
        .sum()
}
