//! Article renderers

use crate::article::ArticleRecord;
use crate::output::{OutputFormat, OutputResult};

/// Renders `article` in `format`
pub fn render(article: &ArticleRecord, format: OutputFormat) -> OutputResult<String> {
    match format {
        OutputFormat::Json => render_json(article),
        OutputFormat::Text => Ok(render_text(article)),
        OutputFormat::Markdown => Ok(render_markdown(article)),
    }
}

/// Pretty-printed JSON with an RFC 3339 `scraped_at`
pub fn render_json(article: &ArticleRecord) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(article)?)
}

/// Plain text: a header block, a rule, then every section
pub fn render_text(article: &ArticleRecord) -> String {
    let mut lines = vec![
        format!("Title: {}", article.title),
        format!("URL: {}", article.url),
        format!("Author: {}", article.author),
        format!("Date: {}", article.publish_date),
        format!("Category: {}", article.category),
        String::new(),
        "=".repeat(60),
        String::new(),
    ];

    for section in &article.sections {
        if !section.heading.is_empty() {
            lines.push(format!("\n## {}\n", section.heading));
        }
        lines.push(section.body.clone());
    }

    lines.join("\n")
}

/// Markdown: title heading, bold metadata, then sections at `level + 1` hashes
pub fn render_markdown(article: &ArticleRecord) -> String {
    let mut lines = vec![
        format!("# {}", article.title),
        String::new(),
        format!("**URL:** {}", article.url),
        format!("**Author:** {}", article.author),
        format!("**Date:** {}", article.publish_date),
        format!("**Category:** {}", article.category),
        String::new(),
        "---".to_string(),
        String::new(),
    ];

    for section in &article.sections {
        if !section.heading.is_empty() {
            let hashes = "#".repeat(usize::from(section.level) + 1);
            lines.push(format!("\n{} {}\n", hashes, section.heading));
        }
        lines.push(section.body.clone());
    }

    lines.join("\n")
}
