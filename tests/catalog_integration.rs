//! Integration tests for the top-books listing.
//!
//! These tests serve listing pages from a mock server and check the
//! identifiers extracted from them.

use std::time::Duration;

use bookfetch_core::{BookId, CatalogError, CatalogLister, DownloadError, HttpClient};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn serve_listing(body: &str) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browse/scores/top"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .expect(1)
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test]
async fn test_list_top_books_returns_first_ids_in_order() {
    let mock_server = serve_listing(
        r#"<html><body><ol>
            <li><a href="/ebooks/1">One</a></li>
            <li><a href="/ebooks/2">Two</a></li>
            <li><a href="/ebooks/3">Three</a></li>
        </ol></body></html>"#,
    )
    .await;

    let lister = CatalogLister::new(HttpClient::new(), &mock_server.uri(), TIMEOUT);
    let ids = lister.list_top_books(2).await.expect("listing should succeed");

    assert_eq!(ids, vec![BookId::new(1), BookId::new(2)]);
}

#[tokio::test]
async fn test_list_top_books_returns_fewer_when_page_is_short() {
    let mock_server = serve_listing(
        r#"<ol><li><a href="/ebooks/10">Ten</a></li><li><a href="/ebooks/x">Bad</a></li></ol>
           <ol><li><a href="/ebooks/20">Twenty</a></li></ol>"#,
    )
    .await;

    let lister = CatalogLister::new(HttpClient::new(), &mock_server.uri(), TIMEOUT);
    let ids = lister.list_top_books(5).await.expect("listing should succeed");

    assert_eq!(ids, vec![BookId::new(10), BookId::new(20)]);
}

#[tokio::test]
async fn test_list_top_books_caps_at_count() {
    let items: String = (1..=250)
        .map(|i| format!(r#"<li><a href="/ebooks/{i}">Book {i}</a></li>"#))
        .collect();
    let mock_server = serve_listing(&format!("<ol>{items}</ol>")).await;

    let lister = CatalogLister::new(HttpClient::new(), &mock_server.uri(), TIMEOUT);
    let ids = lister.list_top_books(5).await.expect("listing should succeed");

    assert_eq!(ids.len(), 5);
    assert_eq!(ids.first(), Some(&BookId::new(1)));
    assert_eq!(ids.last(), Some(&BookId::new(5)));
}

#[tokio::test]
async fn test_list_top_books_sends_browser_user_agent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browse/scores/top"))
        .and(header("user-agent", bookfetch_core::BROWSER_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<ol><li><a href="/ebooks/84">Frankenstein</a></li></ol>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_user_agent(bookfetch_core::BROWSER_USER_AGENT)
        .expect("client should build");
    let lister = CatalogLister::new(client, &mock_server.uri(), TIMEOUT);
    let ids = lister.list_top_books(1).await.expect("listing should succeed");

    assert_eq!(ids, vec![BookId::new(84)]);
}

#[tokio::test]
async fn test_list_top_books_server_error_is_hard_failure() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/browse/scores/top"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let lister = CatalogLister::new(HttpClient::new(), &mock_server.uri(), TIMEOUT);
    let err = lister.list_top_books(10).await.unwrap_err();

    assert!(
        matches!(
            err,
            CatalogError::Request(DownloadError::HttpStatus { status: 503, .. })
        ),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_list_top_books_connection_refused_is_hard_failure() {
    // Port 1 is never listening.
    let lister = CatalogLister::new(HttpClient::new(), "http://127.0.0.1:1", TIMEOUT);
    let err = lister.list_top_books(10).await.unwrap_err();

    assert!(matches!(err, CatalogError::Request(_)));
}
