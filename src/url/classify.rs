//! Single-post vs. archive classification
//!
//! The classifier approximates publishing-platform URL conventions (WordPress-style
//! blogs) without looking at page content, so sitemap output can be filtered before
//! any page is fetched.

use regex::Regex;
use std::fmt;
use url::Url;

/// Minimum path depth required on hosts without a blog-style subdomain
pub const DEFAULT_MIN_PATH_DEPTH: usize = 3;

/// Query keys that mark a listing page
const PAGINATION_KEYS: &[&str] = &["page", "paged", "p", "offset"];

/// First host labels that identify a blog-style host (`blog.example.com`)
const BLOG_SUBDOMAINS: &[&str] = &["blog", "news", "articles", "content"];

/// An archive pattern rule
struct ArchiveRule {
    pattern: &'static str,
    /// Skip this rule on blog-style hosts, where one segment can still be a post
    exempt_on_blog_host: bool,
}

/// Archive/listing path patterns, checked in order
const ARCHIVE_RULES: &[ArchiveRule] = &[
    ArchiveRule {
        pattern: r"^/page/\d+/?$",
        exempt_on_blog_host: false,
    },
    ArchiveRule {
        pattern: r"^/[^/]+/?$",
        exempt_on_blog_host: true,
    },
    ArchiveRule {
        pattern: r"^/[^/]+/page/\d+/?$",
        exempt_on_blog_host: false,
    },
    ArchiveRule {
        pattern: r"^/category/",
        exempt_on_blog_host: false,
    },
    ArchiveRule {
        pattern: r"^/tag/",
        exempt_on_blog_host: false,
    },
    ArchiveRule {
        pattern: r"^/author/",
        exempt_on_blog_host: false,
    },
    ArchiveRule {
        pattern: r"^/archive/",
        exempt_on_blog_host: false,
    },
    ArchiveRule {
        pattern: r"^/search",
        exempt_on_blog_host: false,
    },
    ArchiveRule {
        pattern: r"/feed/?$",
        exempt_on_blog_host: false,
    },
    ArchiveRule {
        pattern: r"\.(xml|rss)$",
        exempt_on_blog_host: false,
    },
];

/// Why a URL was accepted or rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The URL looks like a single post
    SinglePost,
    /// Bare domain root; the caller should go through sitemap discovery instead
    RootDomain,
    /// Pagination query key or `/page/<n>` segment
    Pagination,
    /// Matches a listing/archive path pattern
    ArchivePattern,
    /// Fewer path segments than required
    TooShallow { depth: usize, required: usize },
    /// Last segment is empty or purely numeric
    NoSlug,
    /// The URL could not be parsed at all
    Unparseable,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SinglePost => write!(f, "Valid single post URL"),
            Self::RootDomain => write!(f, "URL is a root domain (use sitemap discovery)"),
            Self::Pagination => write!(f, "URL has pagination parameters"),
            Self::ArchivePattern => write!(f, "URL matches archive pattern"),
            Self::TooShallow { depth, required } => write!(
                f,
                "URL path too shallow ({} segments, need {})",
                depth, required
            ),
            Self::NoSlug => write!(f, "URL doesn't end with a valid slug"),
            Self::Unparseable => write!(f, "URL could not be parsed"),
        }
    }
}

/// Result of classifying a URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlClassification {
    pub is_valid: bool,
    pub reason: String,
    pub verdict: Verdict,
}

impl UrlClassification {
    fn from_verdict(verdict: Verdict) -> Self {
        Self {
            is_valid: verdict == Verdict::SinglePost,
            reason: verdict.to_string(),
            verdict,
        }
    }
}

/// Classifies URLs as single posts or archive pages
#[derive(Debug, Clone)]
pub struct UrlClassifier {
    min_path_depth: usize,
    archive_patterns: Vec<(Regex, bool)>,
    page_segment: Regex,
}

impl Default for UrlClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PATH_DEPTH)
    }
}

impl UrlClassifier {
    /// Creates a classifier requiring `min_path_depth` segments on ordinary hosts
    pub fn new(min_path_depth: usize) -> Self {
        let archive_patterns = ARCHIVE_RULES
            .iter()
            .map(|rule| {
                let regex = Regex::new(&format!("(?i){}", rule.pattern))
                    .expect("archive patterns are valid regexes");
                (regex, rule.exempt_on_blog_host)
            })
            .collect();

        Self {
            min_path_depth,
            archive_patterns,
            page_segment: Regex::new(r"/page/\d+").expect("page segment pattern is valid"),
        }
    }

    /// Returns the configured minimum path depth
    pub fn min_path_depth(&self) -> usize {
        self.min_path_depth
    }

    /// Classifies a URL
    ///
    /// Checks run in order and the first failing check decides:
    /// root domain, pagination, archive pattern, path depth, slug.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_scribe::url::UrlClassifier;
    ///
    /// let classifier = UrlClassifier::default();
    /// assert!(classifier.classify("https://example.com/blog/news/my-post").is_valid);
    /// assert!(!classifier.classify("https://example.com/category/news/").is_valid);
    /// ```
    pub fn classify(&self, url: &str) -> UrlClassification {
        let Ok(parsed) = Url::parse(url) else {
            return UrlClassification::from_verdict(Verdict::Unparseable);
        };
        UrlClassification::from_verdict(self.verdict(&parsed))
    }

    fn verdict(&self, url: &Url) -> Verdict {
        if is_root(url) {
            return Verdict::RootDomain;
        }

        if self.has_pagination(url) {
            return Verdict::Pagination;
        }

        let blog_host = blog_subdomain(url);
        if self.matches_archive_pattern(url.path(), blog_host) {
            return Verdict::ArchivePattern;
        }

        let depth = path_depth(url);
        let required = if blog_host { 1 } else { self.min_path_depth };
        if depth < required {
            return Verdict::TooShallow { depth, required };
        }

        let last_segment = url
            .path()
            .trim_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();
        if last_segment.is_empty() || last_segment.chars().all(|c| c.is_ascii_digit()) {
            return Verdict::NoSlug;
        }

        Verdict::SinglePost
    }

    /// A pagination key only counts when it carries a value; `?page=` is ignored
    fn has_pagination(&self, url: &Url) -> bool {
        let paginated_query = url
            .query_pairs()
            .any(|(key, value)| !value.is_empty() && PAGINATION_KEYS.contains(&key.as_ref()));

        paginated_query || self.page_segment.is_match(url.path())
    }

    fn matches_archive_pattern(&self, path: &str, blog_host: bool) -> bool {
        self.archive_patterns
            .iter()
            .filter(|(_, exempt)| !(blog_host && *exempt))
            .any(|(regex, _)| regex.is_match(path))
    }

    /// Returns true when the URL has neither a path nor a query
    pub fn is_domain_root(&self, url: &str) -> bool {
        Url::parse(url).map(|u| is_root(&u)).unwrap_or(false)
    }

    /// Returns true when the host is a blog-style subdomain such as `blog.example.com`
    pub fn has_blog_subdomain(&self, url: &str) -> bool {
        Url::parse(url).map(|u| blog_subdomain(&u)).unwrap_or(false)
    }
}

fn is_root(url: &Url) -> bool {
    url.path().trim_matches('/').is_empty() && url.query().map_or(true, str::is_empty)
}

fn blog_subdomain(url: &Url) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_lowercase();
    let labels: Vec<&str> = host.split('.').collect();

    labels.len() >= 3 && labels[0] != "www" && BLOG_SUBDOMAINS.contains(&labels[0])
}

fn path_depth(url: &Url) -> usize {
    url.path().split('/').filter(|s| !s.is_empty()).count()
}
