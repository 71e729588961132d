//! Fixtures shared by the integration tests

use std::time::Duration;
use sumi_scribe::crawler::HttpFetcher;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a `<urlset>` sitemap listing `urls`
pub fn urlset(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("<url><loc>{}</loc><lastmod>2024-05-01</lastmod></url>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

/// Builds a `<sitemapindex>` listing child sitemaps
pub fn sitemap_index(children: &[String]) -> String {
    let entries: String = children
        .iter()
        .map(|u| format!("<sitemap><loc>{}</loc></sitemap>", u))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

/// A WordPress-style article page long enough to be accepted
pub fn article_page(title: &str) -> String {
    format!(
        r#"<html><head>
<meta property="og:title" content="{title} | Example Blog">
<meta name="description" content="All about {title}">
<meta name="keywords" content="rust, scraping">
</head><body>
<nav><a href="/">Home</a></nav>
<div class="entry-content">
  <h1>{title}</h1>
  <p>This introduction is long enough to pass the minimum content length check for an article body.</p>
  <h2>Details</h2>
  <p>More text follows here.</p>
  <ul><li>First point</li><li>Second point</li></ul>
</div>
<footer>
  <a class="author-name" href="/author/budi">Budi Santoso</a>
  <a rel="category tag" href="/category/tech">Teknologi</a>
  <span>Diterbitkan Mei 12, 2024</span>
  <a rel="tag" href="/tag/web">web</a>
</footer>
</body></html>"#
    )
}

/// Serves `body` for GET requests to `route`
pub async fn serve(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Answers HEAD requests to `route` with HTTP 200
pub async fn serve_head(server: &MockServer, route: &str) {
    Mock::given(method("HEAD"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

pub fn fetcher() -> HttpFetcher {
    HttpFetcher::new(Duration::from_secs(5)).expect("Failed to build HTTP client")
}
