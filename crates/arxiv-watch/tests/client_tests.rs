//! Page fetcher tests using wiremock.

use std::time::Duration;

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use arxiv_watch::{ArxivClient, ClientError, Config, PageFetcher, QueryBuilder, SearchQuery};

fn setup(mock_server: &MockServer) -> (ArxivClient, SearchQuery) {
    let dir = std::env::temp_dir();
    let config = Config::for_testing(&mock_server.uri(), dir);
    let client = ArxivClient::new(&config).unwrap();
    let query = QueryBuilder::new(&config.search_url).unwrap().build(&config.search_terms).unwrap();
    (client, query)
}

#[tokio::test]
async fn test_fetch_returns_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/advanced"))
        .and(query_param("terms-0-term", "fraud detection"))
        .and(query_param("terms-0-operator", "AND"))
        .and(query_param("size", "200"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, query) = setup(&mock_server);
    let body = client.fetch(&query).await.unwrap();
    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn test_fetch_sends_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", arxiv_watch::config::search::USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(""))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, query) = setup(&mock_server);
    assert_eq!(client.user_agent(), arxiv_watch::config::search::USER_AGENT);
    client.fetch(&query).await.unwrap();
}

#[tokio::test]
async fn test_rate_limited_reads_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "120"))
        .mount(&mock_server)
        .await;

    let (client, query) = setup(&mock_server);
    let err = client.fetch(&query).await.unwrap_err();

    match err {
        ClientError::RateLimited { retry_after } => assert_eq!(retry_after, Duration::from_secs(120)),
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn test_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let (client, query) = setup(&mock_server);
    let err = client.fetch(&query).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound { .. }));
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_server_error_carries_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let (client, query) = setup(&mock_server);
    let err = client.fetch(&query).await.unwrap_err();

    match err {
        ClientError::Server { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("expected Server, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unexpected_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&mock_server)
        .await;

    let (client, query) = setup(&mock_server);
    let err = client.fetch(&query).await.unwrap_err();
    assert!(matches!(err, ClientError::UnexpectedStatus { status: 403, .. }));
}

#[tokio::test]
async fn test_no_retry_on_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, query) = setup(&mock_server);
    assert!(client.fetch(&query).await.is_err());
}

#[test]
fn test_client_debug_shows_user_agent() {
    let client = ArxivClient::new(&Config::default()).unwrap();
    assert!(format!("{client:?}").contains("arxiv-watch/"));
}
