//! Block-level content model
//!
//! The main content region is flattened into a sequence of [`Block`]s once. Both the
//! cleaned markup and the section list are rendered from that sequence.

use crate::article::ContentSection;
use crate::extract::element_text;
use scraper::ElementRef;

/// A recognized block-level element with its text already cleaned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(String),
    Heading { level: u8, text: String },
    List { ordered: bool, items: Vec<String> },
    Table(Vec<Vec<String>>),
    Blockquote(String),
}

impl Block {
    /// Builds a block from an element, or `None` for unrecognized or empty elements
    fn from_element(element: ElementRef<'_>) -> Option<Self> {
        let block = match element.value().name() {
            "p" => Self::Paragraph(element_text(element)),
            "h2" => Self::heading(2, element),
            "h3" => Self::heading(3, element),
            "h4" => Self::heading(4, element),
            "blockquote" => Self::Blockquote(element_text(element)),
            name @ ("ul" | "ol") => Self::List {
                ordered: name == "ol",
                items: list_items(element),
            },
            "table" => Self::Table(table_rows(element)),
            _ => return None,
        };
        (!block.is_empty()).then_some(block)
    }

    fn heading(level: u8, element: ElementRef<'_>) -> Self {
        Self::Heading {
            level,
            text: element_text(element),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Self::Paragraph(text) | Self::Blockquote(text) => text.is_empty(),
            Self::Heading { text, .. } => text.is_empty(),
            Self::List { items, .. } => items.is_empty(),
            Self::Table(rows) => rows.is_empty(),
        }
    }

    /// Minimal whitelisted markup for this block
    pub fn to_html(&self) -> String {
        match self {
            Self::Paragraph(text) => format!("<p>{}</p>", escape_html(text)),
            Self::Blockquote(text) => format!("<blockquote>{}</blockquote>", escape_html(text)),
            Self::Heading { level, text } => {
                format!("<h{level}>{}</h{level}>", escape_html(text))
            }
            Self::List { ordered, items } => {
                let tag = if *ordered { "ol" } else { "ul" };
                let items: String = items
                    .iter()
                    .map(|item| format!("<li>{}</li>", escape_html(item)))
                    .collect();
                format!("<{tag}>{items}</{tag}>")
            }
            Self::Table(rows) => {
                let rows: String = rows
                    .iter()
                    .map(|cells| {
                        let cells: String = cells
                            .iter()
                            .map(|cell| format!("<td>{}</td>", escape_html(cell)))
                            .collect();
                        format!("<tr>{cells}</tr>")
                    })
                    .collect();
                format!("<table>{rows}</table>")
            }
        }
    }
}

/// Collects the recognized blocks under `root` in document order
///
/// A recognized block is not descended into, so a paragraph inside a blockquote is
/// part of the blockquote and not a block of its own.
pub fn collect_blocks(root: ElementRef<'_>) -> Vec<Block> {
    let mut blocks = Vec::new();
    walk(root, &mut blocks);
    blocks
}

fn walk(parent: ElementRef<'_>, blocks: &mut Vec<Block>) {
    for child in parent.children().filter_map(ElementRef::wrap) {
        if is_block_tag(child.value().name()) {
            if let Some(block) = Block::from_element(child) {
                blocks.push(block);
            }
        } else {
            walk(child, blocks);
        }
    }
}

fn is_block_tag(name: &str) -> bool {
    matches!(
        name,
        "p" | "h2" | "h3" | "h4" | "ul" | "ol" | "table" | "blockquote"
    )
}

fn list_items(list: ElementRef<'_>) -> Vec<String> {
    list.descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "li")
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect()
}

fn table_rows(table: ElementRef<'_>) -> Vec<Vec<String>> {
    table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "tr")
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .filter(|cell| matches!(cell.value().name(), "td" | "th"))
                .map(element_text)
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect()
}

/// Renders blocks as newline-separated minimal markup
pub fn render_html(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::to_html)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Splits blocks into an introduction and one section per `<h2>`
///
/// `<h3>` headings become `### ` marker lines inside the open section and are dropped
/// before the first `<h2>`. `<h4>` carries no section text; blockquotes are added
/// like paragraphs. Sections whose body is empty are omitted.
pub fn segment_sections(blocks: &[Block]) -> Vec<ContentSection> {
    let mut intro: Vec<String> = Vec::new();
    let mut current: Option<(String, Vec<String>)> = None;
    let mut sections = Vec::new();

    for block in blocks {
        let text = match block {
            Block::Heading { level: 2, text } => {
                if let Some((heading, parts)) = current.take() {
                    push_section(&mut sections, heading, &parts);
                }
                current = Some((text.clone(), Vec::new()));
                continue;
            }
            Block::Heading { level: 3, text } => match current {
                Some(_) => format!("### {}", text),
                None => continue,
            },
            Block::Heading { .. } => continue,
            Block::Paragraph(text) | Block::Blockquote(text) => text.clone(),
            Block::List { items, .. } => items
                .iter()
                .map(|item| format!("• {}", item))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Table(rows) => rows
                .iter()
                .map(|cells| cells.join(" | "))
                .collect::<Vec<_>>()
                .join("\n"),
        };

        match current.as_mut() {
            Some((_, parts)) => parts.push(text),
            None => intro.push(text),
        }
    }

    if let Some((heading, parts)) = current {
        push_section(&mut sections, heading, &parts);
    }

    let intro = intro.join("\n\n");
    if intro.trim().is_empty() {
        sections
    } else {
        let mut all = Vec::with_capacity(sections.len() + 1);
        all.push(ContentSection::introduction(intro.trim()));
        all.extend(sections);
        all
    }
}

fn push_section(sections: &mut Vec<ContentSection>, heading: String, parts: &[String]) {
    let body = parts.join("\n\n");
    let body = body.trim();
    if !body.is_empty() {
        sections.push(ContentSection {
            heading,
            body: body.to_string(),
            level: 2,
        });
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
