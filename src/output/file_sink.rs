//! File output for scraped articles

use crate::article::ArticleRecord;
use crate::output::{render, ArticleSink, OutputFormat, OutputResult};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Maximum length, in characters, of the title part of a file name
const MAX_TITLE_CHARS: usize = 50;

/// Reduces a title to a file-name-safe stem
///
/// Keeps alphanumerics, spaces, `-` and `_`, turns spaces into underscores and
/// truncates to 50 characters.
pub fn safe_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .map(|c| if c == ' ' { '_' } else { c })
        .take(MAX_TITLE_CHARS)
        .collect()
}

/// Writes each article to `<safe_title>_<YYYYmmdd_HHMMSS>.<ext>` in a directory
#[derive(Debug, Clone)]
pub struct FileSink {
    directory: PathBuf,
    format: OutputFormat,
}

impl FileSink {
    /// Creates the sink, creating `directory` if needed
    pub fn new(directory: impl Into<PathBuf>, format: OutputFormat) -> OutputResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory, format })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Renders and writes `article`, returning the written path
    ///
    /// The file is created exclusively. When the name is taken, `_2`, `_3` and so on
    /// are tried in turn, so concurrent writers never overwrite each other.
    pub fn write(&self, article: &ArticleRecord) -> OutputResult<PathBuf> {
        let rendered = render(article, self.format)?;
        let stem = format!(
            "{}_{}",
            safe_title(&article.title),
            Local::now().format("%Y%m%d_%H%M%S")
        );
        let extension = self.format.extension();

        let mut suffix = 1;
        loop {
            let name = if suffix == 1 {
                format!("{}.{}", stem, extension)
            } else {
                format!("{}_{}.{}", stem, suffix, extension)
            };
            let path = self.directory.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(rendered.as_bytes())?;
                    tracing::debug!("Wrote {}", path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => suffix += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl ArticleSink for FileSink {
    fn save(&self, article: &ArticleRecord) -> OutputResult<String> {
        self.write(article).map(|path| path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::ContentSection;
    use chrono::Utc;
    use tempfile::TempDir;

    fn article(title: &str) -> ArticleRecord {
        ArticleRecord {
            url: "https://example.com/blog/x/post".to_string(),
            title: title.to_string(),
            author: "Unknown".to_string(),
            publish_date: "Unknown".to_string(),
            category: "Unknown".to_string(),
            meta_description: String::new(),
            content_html: "<p>body</p>".to_string(),
            sections: vec![ContentSection::introduction("body")],
            tags: vec![],
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn test_safe_title() {
        assert_eq!(safe_title("Hello, World: A/B test!"), "Hello_World_AB_test");
        assert_eq!(safe_title("Berita Über-cepat"), "Berita_Über-cepat");
        assert_eq!(safe_title(&"x".repeat(80)).chars().count(), 50);
    }

    #[test]
    fn test_write_json_file() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path().join("out"), OutputFormat::Json).unwrap();

        let path = sink.write(&article("My Post")).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("My_Post_"));
        assert!(name.ends_with(".json"));

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["title"], "My Post");
    }

    #[test]
    fn test_same_title_same_second_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path(), OutputFormat::Markdown).unwrap();

        let first = sink.write(&article("Twin")).unwrap();
        let second = sink.write(&article("Twin")).unwrap();
        assert_ne!(first, second);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_concurrent_writers_get_distinct_files() {
        let dir = TempDir::new().unwrap();
        let sink = FileSink::new(dir.path(), OutputFormat::Json).unwrap();
        let record = article("Shared Title");
        let (sink, record) = (&sink, &record);

        let paths: Vec<PathBuf> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(move || sink.write(record).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let mut unique = paths.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 8);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 8);
    }
}
