//! End-to-end tests of a whole run against a mock catalog.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bookfetch_core::{FetchConfig, PipelineError, run_pipeline};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING: &str = r#"<html><body>
  <ol>
    <li><a href="/ebooks/1">Plain text book</a></li>
    <li><a href="/ebooks/about">Not a book</a></li>
    <li><a href="/ebooks/2">EPUB only book</a></li>
    <li><a href="/ebooks/3">Missing book</a></li>
  </ol>
  <ol>
    <li><a href="/ebooks/4">Beyond the requested count</a></li>
  </ol>
</body></html>"#;

async fn mount_book(server: &MockServer, file_path: &str, body: &[u8]) {
    Mock::given(method("HEAD"))
        .and(path(file_path))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(file_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
        .mount(server)
        .await;
}

async fn catalog() -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browse/scores/top"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING))
        .mount(&mock_server)
        .await;
    mount_book(&mock_server, "/files/1/1-0.txt", b"The Quick Brown Fox.").await;
    mount_book(&mock_server, "/files/2/2.epub", b"PK epub bytes").await;
    mock_server
}

fn config(server: &MockServer, output_dir: &std::path::Path) -> FetchConfig {
    let mut config = FetchConfig::default()
        .with_base_url(server.uri())
        .with_output_dir(output_dir);
    config.probe_timeout = Duration::from_millis(500);
    config.download_timeout = Duration::from_secs(2);
    config
}

#[tokio::test]
async fn test_run_pipeline_downloads_and_tallies() {
    let mock_server = catalog().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let output_dir = temp_dir.path().join("libros");
    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&reported);

    let summary = run_pipeline(config(&mock_server, &output_dir), 3, move |result| {
        sink.lock().unwrap().push(result.id.get());
    })
    .await
    .expect("run should succeed");

    assert_eq!(summary.books, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.already_present, 0);
    assert_eq!(summary.output_dir, output_dir);

    let text = std::fs::read_to_string(output_dir.join("libro_1.txt")).expect("txt written");
    assert_eq!(text, "quick brown fox");
    let epub = std::fs::read(output_dir.join("libro_2.epub")).expect("epub written");
    assert_eq!(epub, b"PK epub bytes");
    assert!(!output_dir.join("libro_4.txt").exists());

    let mut reported = reported.lock().unwrap().clone();
    reported.sort_unstable();
    assert_eq!(reported, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_run_pipeline_second_run_skips_existing() {
    let mock_server = catalog().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    run_pipeline(config(&mock_server, temp_dir.path()), 2, |_| {})
        .await
        .expect("first run should succeed");
    let summary = run_pipeline(config(&mock_server, temp_dir.path()), 2, |_| {})
        .await
        .expect("second run should succeed");

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.already_present, 2);
}

#[tokio::test]
async fn test_run_pipeline_listing_failure_aborts() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browse/scores/top"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let err = run_pipeline(config(&mock_server, temp_dir.path()), 5, |_| {})
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::Catalog(_)), "unexpected error: {err:?}");
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1, "no book should be probed");
}

#[tokio::test]
async fn test_run_pipeline_zero_books() {
    let mock_server = catalog().await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let summary = run_pipeline(config(&mock_server, temp_dir.path()), 0, |_| {})
        .await
        .expect("run should succeed");

    assert_eq!(summary.books, 0);
    assert_eq!(summary.succeeded + summary.failed, 0);
}
