//! Domain worker tests: discovery, saving, history and shutdown

use crate::common::{article_page, fetcher, serve, serve_head, urlset};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use sumi_scribe::crawler::{HttpFetcher, WorkerContext, WorkerManager, WorkerSettings};
use sumi_scribe::output::{FileSink, OutputFormat};
use sumi_scribe::storage::{HistoryStore, SqliteHistory};
use sumi_scribe::ArticleScraper;
use tempfile::TempDir;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_context(
    dir: &Path,
    format: OutputFormat,
    settings: WorkerSettings,
) -> (WorkerContext<HttpFetcher>, Arc<dyn HistoryStore>) {
    let history: Arc<dyn HistoryStore> =
        Arc::new(SqliteHistory::new(&dir.join("history.db")).expect("Failed to open history"));
    let sink = FileSink::new(dir.join("out"), format).expect("Failed to create output directory");
    let scraper = ArticleScraper::new(fetcher()).with_history(Arc::clone(&history));

    let context = WorkerContext {
        scraper: Arc::new(scraper),
        sink: Arc::new(sink),
        history: Some(Arc::clone(&history)),
        settings,
    };
    (context, history)
}

fn quick_settings() -> WorkerSettings {
    WorkerSettings {
        request_delay: Duration::ZERO,
        ..Default::default()
    }
}

fn saved_files(dir: &Path, extension: &str) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir.join("out"))
        .expect("Output directory exists")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|e| e == extension))
        .collect()
}

async fn mount_blog(server: &MockServer) {
    let base_url = server.uri();
    serve_head(server, "/sitemap.xml").await;
    serve(
        server,
        "/sitemap.xml",
        urlset(&[
            format!("{}/2024/05/first-post", base_url),
            format!("{}/2024/05/second-post", base_url),
        ]),
    )
    .await;
    serve(server, "/2024/05/first-post", article_page("First Post")).await;
    serve(server, "/2024/05/second-post", article_page("Second Post")).await;
}

#[tokio::test]
async fn test_root_url_is_discovered_and_saved() {
    let mock_server = MockServer::start().await;
    mount_blog(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let (context, history) = create_context(dir.path(), OutputFormat::Json, quick_settings());
    let manager = WorkerManager::new(context);

    let stats = manager.run(&[format!("{}/", mock_server.uri())]).await;
    assert_eq!(stats.saved, 2);
    assert_eq!(stats.fetch_failures, 0);

    let files = saved_files(dir.path(), "json");
    assert_eq!(files.len(), 2);

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
    assert!(saved["title"].as_str().unwrap().ends_with("Post"));
    assert!(saved["content"].as_str().unwrap().contains("<h2>Details</h2>"));
    assert_eq!(saved["sections"][1]["heading"], "Details");

    assert_eq!(history.count().unwrap(), 2);
    let url = format!("{}/2024/05/first-post", mock_server.uri());
    assert!(history.seen(&url).unwrap());
}

#[tokio::test]
async fn test_second_run_skips_scraped_urls() {
    let mock_server = MockServer::start().await;
    mount_blog(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let (context, _history) = create_context(dir.path(), OutputFormat::Markdown, quick_settings());
    let manager = WorkerManager::new(context);
    let urls = vec![format!("{}/sitemap.xml", mock_server.uri())];

    let first = manager.run(&urls).await;
    assert_eq!(first.saved, 2);

    let second = manager.run(&urls).await;
    assert_eq!(second.saved, 0);
    assert_eq!(second.skipped, 2);

    assert_eq!(saved_files(dir.path(), "md").len(), 2);
}

#[tokio::test]
async fn test_direct_article_url() {
    let mock_server = MockServer::start().await;
    mount_blog(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let (context, history) = create_context(dir.path(), OutputFormat::Text, quick_settings());
    let manager = WorkerManager::new(context);

    let url = format!("{}/2024/05/second-post", mock_server.uri());
    let stats = manager.run(&[url.clone()]).await;

    assert_eq!(stats.saved, 1);
    assert!(history.seen(&url).unwrap());

    let files = saved_files(dir.path(), "txt");
    assert_eq!(files.len(), 1);
    let file_name = files[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(file_name.starts_with("Second_Post_"));
}

#[tokio::test]
async fn test_stop_before_run_fetches_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let (context, _history) = create_context(dir.path(), OutputFormat::Json, quick_settings());
    let manager = WorkerManager::new(context);
    manager.stop();

    let stats = manager
        .run(&[format!("{}/2024/05/first-post", mock_server.uri())])
        .await;
    assert_eq!(stats.total(), 0);
}

#[tokio::test]
async fn test_continuous_worker_stops_on_shutdown() {
    let mock_server = MockServer::start().await;
    mount_blog(&mock_server).await;

    let dir = TempDir::new().unwrap();
    let settings = WorkerSettings {
        request_delay: Duration::ZERO,
        cycle_delay: Duration::from_secs(3600),
        continuous: true,
        ..Default::default()
    };
    let (context, history) = create_context(dir.path(), OutputFormat::Json, settings);
    let manager = WorkerManager::new(context);
    let shutdown = manager.shutdown_handle();
    let urls = vec![format!("{}/2024/05/first-post", mock_server.uri())];

    let stopper = async {
        for _ in 0..100 {
            if history.count().unwrap_or(0) > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        shutdown.send_replace(true);
    };

    let (stats, ()) = tokio::time::timeout(
        Duration::from_secs(10),
        async { tokio::join!(manager.run(&urls), stopper) },
    )
    .await
    .expect("Worker did not stop during its cycle pause");

    assert_eq!(stats.saved, 1);
}

#[tokio::test]
async fn test_explicit_sitemap_url_without_xml_suffix() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    serve(
        &mock_server,
        "/index.php",
        urlset(&[format!("{}/2024/05/first-post", base_url)]),
    )
    .await;
    serve(&mock_server, "/2024/05/first-post", article_page("First Post")).await;

    let dir = TempDir::new().unwrap();
    let (context, history) = create_context(dir.path(), OutputFormat::Json, quick_settings());
    let manager = WorkerManager::new(context);

    let stats = manager
        .run_sitemap(&format!("{}/index.php?sitemap=posts", base_url))
        .await;

    assert_eq!(stats.saved, 1);
    assert_eq!(stats.rejected, 0);
    assert_eq!(saved_files(dir.path(), "json").len(), 1);
    assert_eq!(history.count().unwrap(), 1);
}
