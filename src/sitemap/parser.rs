//! Sitemap XML parsing
//!
//! Documents are read with quick-xml in a single pass. Only direct children of a
//! `<url>` or `<sitemap>` record are read as fields, so extension elements such as
//! `<image:loc>` never replace the page location.

use crate::sitemap::SitemapEntry;
use quick_xml::events::Event;
use quick_xml::Reader;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq)]
pub enum SitemapDocument {
    /// `<sitemapindex>`: child sitemap URLs in document order
    Index(Vec<String>),
    /// `<urlset>`: page entries in document order
    UrlSet(Vec<SitemapEntry>),
}

impl SitemapDocument {
    /// Page entries; an index has none
    pub fn into_entries(self) -> Vec<SitemapEntry> {
        match self {
            Self::UrlSet(entries) => entries,
            Self::Index(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Loc,
    LastMod,
    ChangeFreq,
    Priority,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"loc" => Some(Self::Loc),
            b"lastmod" => Some(Self::LastMod),
            b"changefreq" => Some(Self::ChangeFreq),
            b"priority" => Some(Self::Priority),
            _ => None,
        }
    }
}

/// A `<url>` or `<sitemap>` element being read
#[derive(Debug, Default)]
struct Record {
    depth: usize,
    is_sitemap: bool,
    loc: String,
    lastmod: String,
    changefreq: String,
    priority: String,
}

impl Record {
    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Loc => &mut self.loc,
            Field::LastMod => &mut self.lastmod,
            Field::ChangeFreq => &mut self.changefreq,
            Field::Priority => &mut self.priority,
        }
    }

    fn into_entry(self) -> Option<SitemapEntry> {
        let url = self.loc.trim();
        if url.is_empty() {
            return None;
        }

        let priority = match self.priority.trim() {
            "" => None,
            raw => match raw.parse::<f64>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::debug!("Ignoring unparsable priority {:?} for {}", raw, url);
                    None
                }
            },
        };

        Some(SitemapEntry {
            url: url.to_string(),
            last_modified: non_empty(&self.lastmod),
            change_frequency: non_empty(&self.changefreq),
            priority,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parses a sitemap document
///
/// A document containing a `<sitemapindex>` element is an index; anything else is
/// read as a URL set. Malformed XML stops the parse and keeps the records read so far.
///
/// # Example
///
/// ```
/// use sumi_scribe::sitemap::{parse_sitemap, SitemapDocument};
///
/// let xml = "<urlset><url><loc>https://example.com/a/b/c</loc></url></urlset>";
/// match parse_sitemap(xml) {
///     SitemapDocument::UrlSet(entries) => assert_eq!(entries[0].url, "https://example.com/a/b/c"),
///     SitemapDocument::Index(_) => unreachable!(),
/// }
/// ```
pub fn parse_sitemap(xml: &str) -> SitemapDocument {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut is_index = false;
    let mut depth = 0usize;
    let mut record: Option<Record> = None;
    let mut field: Option<Field> = None;
    let mut children = Vec::new();
    let mut entries = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                let name = e.local_name();
                match name.as_ref() {
                    b"sitemapindex" => is_index = true,
                    b"url" | b"sitemap" if record.is_none() => {
                        record = Some(Record {
                            depth,
                            is_sitemap: name.as_ref() == b"sitemap",
                            ..Default::default()
                        });
                    }
                    other => {
                        if record.as_ref().is_some_and(|r| depth == r.depth + 1) {
                            field = Field::from_name(other);
                        }
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"sitemapindex" {
                    is_index = true;
                }
            }
            Ok(Event::Text(e)) => {
                if let (Some(r), Some(f)) = (record.as_mut(), field) {
                    match e.unescape() {
                        Ok(text) => r.field_mut(f).push_str(&text),
                        Err(err) => tracing::debug!("Skipping undecodable text: {}", err),
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let (Some(r), Some(f)) = (record.as_mut(), field) {
                    r.field_mut(f).push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(_)) => {
                let closes_record = record.as_ref().is_some_and(|r| r.depth == depth);
                if closes_record {
                    if let Some(finished) = record.take() {
                        let is_sitemap = finished.is_sitemap;
                        if let Some(entry) = finished.into_entry() {
                            if is_sitemap {
                                children.push(entry.url);
                            } else {
                                entries.push(entry);
                            }
                        }
                    }
                }
                field = None;
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::warn!(
                    "Malformed sitemap XML at position {}: {}",
                    reader.buffer_position(),
                    e
                );
                break;
            }
            _ => {}
        }
    }

    if is_index {
        SitemapDocument::Index(children)
    } else {
        SitemapDocument::UrlSet(entries)
    }
}
