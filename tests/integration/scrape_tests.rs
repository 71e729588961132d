//! Scrape pipeline tests against a mock HTTP server

use crate::common::{article_page, fetcher, serve, serve_head, sitemap_index, urlset};
use std::time::Duration;
use sumi_scribe::crawler::SitemapScrapeOptions;
use sumi_scribe::sitemap::{discover_sitemap, traverse};
use sumi_scribe::{ArticleScraper, ScrapeOutcome};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_scrape_single_article() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    serve(&mock_server, "/2024/05/hello-world", article_page("Hello World")).await;

    let scraper = ArticleScraper::new(fetcher());
    let url = format!("{}/2024/05/hello-world", base_url);
    let article = scraper
        .scrape(&url, true)
        .await
        .into_article()
        .expect("Expected an article");

    assert_eq!(article.url, url);
    assert_eq!(article.title, "Hello World");
    assert_eq!(article.author, "Budi Santoso");
    assert_eq!(article.category, "Teknologi");
    assert_eq!(article.publish_date, "Mei 12, 2024");
    assert_eq!(article.meta_description, "All about Hello World");
    assert!(article.content_html.contains("<h2>Details</h2>"));
    assert!(!article.content_html.contains("Home"));

    assert_eq!(article.sections.len(), 2);
    assert!(article.sections[0].is_introduction());
    assert_eq!(article.sections[1].heading, "Details");
    assert!(article.sections[1].body.contains("• First point"));

    for tag in ["rust", "scraping", "web"] {
        assert!(article.tags.iter().any(|t| t == tag), "missing tag {}", tag);
    }
}

#[tokio::test]
async fn test_archive_url_is_skipped_without_fetch() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_page("Listing")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let scraper = ArticleScraper::new(fetcher());
    let url = format!("{}/category/news/", mock_server.uri());
    let outcome = scraper.scrape(&url, true).await;

    assert!(matches!(outcome, ScrapeOutcome::Skipped { .. }));
}

#[tokio::test]
async fn test_missing_page_is_fetch_failure() {
    let mock_server = MockServer::start().await;

    let scraper = ArticleScraper::new(fetcher());
    let url = format!("{}/2024/05/gone-post", mock_server.uri());
    let outcome = scraper.scrape(&url, true).await;

    assert_eq!(
        outcome,
        ScrapeOutcome::FetchFailed {
            error: "HTTP 404".to_string()
        }
    );
}

#[tokio::test]
async fn test_short_page_is_rejected() {
    let mock_server = MockServer::start().await;
    serve(
        &mock_server,
        "/2024/05/stub-post",
        "<html><body><article><h1>Stub</h1><p>Too short.</p></article></body></html>".to_string(),
    )
    .await;

    let scraper = ArticleScraper::new(fetcher());
    let url = format!("{}/2024/05/stub-post", mock_server.uri());
    match scraper.scrape(&url, true).await {
        ScrapeOutcome::Rejected { reason } => assert!(reason.contains("too short")),
        other => panic!("Expected a rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_sitemap_index_prefers_post_sitemaps() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    serve(
        &mock_server,
        "/sitemap_index.xml",
        sitemap_index(&[
            format!("{}/category-sitemap.xml", base_url),
            format!("{}/post-sitemap.xml", base_url),
        ]),
    )
    .await;
    serve(
        &mock_server,
        "/post-sitemap.xml",
        urlset(&[
            format!("{}/2024/05/first-post", base_url),
            format!("{}/2024/05/second-post", base_url),
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/category-sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher();
    let entries = traverse(
        &fetcher,
        &format!("{}/sitemap_index.xml", base_url),
        None,
        None,
    )
    .expect("Filter is valid")
    .collect_all()
    .await;

    let urls: Vec<&str> = entries.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/2024/05/first-post", base_url),
            format!("{}/2024/05/second-post", base_url),
        ]
    );
    assert_eq!(entries[0].last_modified.as_deref(), Some("2024-05-01"));
}

#[tokio::test]
async fn test_sitemap_scrape_respects_max_and_classification() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    serve(
        &mock_server,
        "/sitemap.xml",
        urlset(&[
            format!("{}/category/news/", base_url),
            format!("{}/2024/05/first-post", base_url),
            format!("{}/2024/05/missing-post", base_url),
            format!("{}/2024/05/third-post", base_url),
            format!("{}/2024/05/fourth-post", base_url),
        ]),
    )
    .await;
    serve(&mock_server, "/2024/05/first-post", article_page("First")).await;
    serve(&mock_server, "/2024/05/third-post", article_page("Third")).await;

    let scraper = ArticleScraper::new(fetcher());
    let options = SitemapScrapeOptions {
        url_filter: None,
        max_articles: Some(3),
        delay: Duration::ZERO,
    };
    let mut scrape = scraper
        .from_sitemap(&format!("{}/sitemap.xml", base_url), options)
        .expect("No filter given");

    let mut titles = Vec::new();
    while let Some(article) = scrape.next_article().await {
        titles.push(article.title);
    }

    assert_eq!(titles, vec!["First", "Third"]);
    assert_eq!(scrape.accepted(), 3);

    let stats = scrape.stats();
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_sitemap_url_filter() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    serve(
        &mock_server,
        "/sitemap.xml",
        urlset(&[
            format!("{}/news/2024/kept-post", base_url),
            format!("{}/events/2024/dropped-post", base_url),
        ]),
    )
    .await;

    let fetcher = fetcher();
    let entries = traverse(
        &fetcher,
        &format!("{}/sitemap.xml", base_url),
        Some("/news/"),
        None,
    )
    .expect("Filter is valid")
    .collect_all()
    .await;

    assert_eq!(entries.len(), 1);
    assert!(entries[0].url.ends_with("/news/2024/kept-post"));
}

#[tokio::test]
async fn test_discover_sitemap_probes_in_order() {
    let mock_server = MockServer::start().await;
    serve_head(&mock_server, "/sitemap_index.xml").await;
    serve_head(&mock_server, "/wp-sitemap.xml").await;

    let fetcher = fetcher();
    let found = discover_sitemap(&fetcher, &format!("{}/", mock_server.uri())).await;

    assert_eq!(found, Some(format!("{}/sitemap_index.xml", mock_server.uri())));
}

#[tokio::test]
async fn test_discover_sitemap_none_found() {
    let mock_server = MockServer::start().await;

    let fetcher = fetcher();
    assert_eq!(discover_sitemap(&fetcher, &mock_server.uri()).await, None);
}
