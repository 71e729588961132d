use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_scribe::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Parses a URL and requires an http(s) scheme with a host
pub fn parse_http_url(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    Ok(url)
}

/// Returns true when the URL points directly at an XML sitemap
pub fn is_sitemap_url(url: &str) -> bool {
    url.to_lowercase().ends_with(".xml")
}

/// Groups URLs by their lowercase host
///
/// Groups keep the order in which each host was first seen, and URLs keep their
/// order within a group. URLs without a parsable host are dropped with a warning.
pub fn group_by_domain(urls: &[String]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();

    for url in urls {
        let domain = match parse_http_url(url) {
            Ok(parsed) => extract_domain(&parsed),
            Err(e) => {
                tracing::warn!("Ignoring URL {}: {}", url, e);
                None
            }
        };
        let Some(domain) = domain else {
            continue;
        };

        match groups.iter_mut().find(|(d, _)| *d == domain) {
            Some((_, members)) => members.push(url.clone()),
            None => groups.push((domain, vec![url.clone()])),
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_subdomain() {
        let url = Url::parse("https://blog.example.com/post").unwrap();
        assert_eq!(extract_domain(&url), Some("blog.example.com".to_string()));
    }

    #[test]
    fn test_extract_with_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_parse_http_url_rejects_other_schemes() {
        assert!(parse_http_url("https://example.com/a").is_ok());
        assert!(parse_http_url("http://example.com/a").is_ok());
        assert!(matches!(
            parse_http_url("ftp://example.com/a"),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(matches!(
            parse_http_url("not a url"),
            Err(UrlError::Parse(_))
        ));
    }

    #[test]
    fn test_is_sitemap_url() {
        assert!(is_sitemap_url("https://example.com/sitemap.xml"));
        assert!(is_sitemap_url("https://example.com/POST-SITEMAP.XML"));
        assert!(!is_sitemap_url("https://example.com/blog/post"));
    }

    #[test]
    fn test_group_by_domain_keeps_order() {
        let urls = vec![
            "https://a.com/1".to_string(),
            "https://B.com/1".to_string(),
            "https://a.com/2".to_string(),
            "mailto:someone@example.com".to_string(),
            "https://b.com/2".to_string(),
        ];

        let groups = group_by_domain(&urls);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "a.com");
        assert_eq!(groups[0].1, vec!["https://a.com/1", "https://a.com/2"]);
        assert_eq!(groups[1].0, "b.com");
        assert_eq!(groups[1].1, vec!["https://B.com/1", "https://b.com/2"]);
    }
}
