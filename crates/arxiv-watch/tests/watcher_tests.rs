//! End-to-end runs against a mock search endpoint.

use std::fs;
use std::sync::Arc;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use arxiv_watch::discovery::CollectingObserver;
use arxiv_watch::{
    ArxivClient, Config, JsonFileStore, MemoryStore, SeenStore, SkipReason, StateError, WatchError,
    Watcher,
};

const FIXTURE: &str = include_str!("fixtures/search_results.html");

async fn mount_fixture(mock_server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/search/advanced"))
        .and(query_param("terms-0-term", "fraud detection"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FIXTURE))
        .expect(expected_calls)
        .mount(mock_server)
        .await;
}

fn watcher(config: &Config) -> Watcher<ArxivClient, JsonFileStore> {
    Watcher::from_config(config).unwrap()
}

// =============================================================================
// Full runs
// =============================================================================

#[tokio::test]
async fn test_first_run_emits_and_persists() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, 1).await;
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_testing(&mock_server.uri(), dir.path());

    let report = watcher(&config).run_once().await.unwrap();

    let ids: Vec<_> = report.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["2401.10001", "2401.10002", "2312.09999"]);
    assert_eq!(report.summary.entries, 4);
    assert_eq!(report.summary.skipped_malformed, 1);
    assert_eq!(report.summary.total_seen, 3);
    assert!(report.persisted);
    assert!(report.query.as_str().starts_with(&config.search_url));

    assert_eq!(
        fs::read_to_string(config.seen_path()).unwrap(),
        "[\n  \"2312.09999\",\n  \"2401.10001\",\n  \"2401.10002\"\n]"
    );
}

#[tokio::test]
async fn test_second_run_is_quiet() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, 2).await;
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_testing(&mock_server.uri(), dir.path());
    let watcher = watcher(&config);

    watcher.run_once().await.unwrap();
    let before = fs::read_to_string(config.seen_path()).unwrap();

    let report = watcher.run_once().await.unwrap();
    assert!(report.records.is_empty());
    assert_eq!(report.summary.skipped_seen, 3);
    assert_eq!(fs::read_to_string(config.seen_path()).unwrap(), before);
}

#[tokio::test]
async fn test_lock_released_after_run() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, 1).await;
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_testing(&mock_server.uri(), dir.path());
    let watcher = watcher(&config);

    watcher.run_once().await.unwrap();
    assert!(watcher.store().lock().is_ok());
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, 2).await;
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_testing(&mock_server.uri(), dir.path());

    let dry = watcher(&config).dry_run(true);
    let report = dry.run_once().await.unwrap();
    assert_eq!(report.records.len(), 3);
    assert!(!report.persisted);
    assert_eq!(report.summary.total_seen, 0);
    assert!(!config.seen_path().exists());

    // A dry run does not consume anything.
    let report = dry.run_once().await.unwrap();
    assert_eq!(report.records.len(), 3);
}

#[tokio::test]
async fn test_observer_sees_malformed_entry() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, 1).await;
    let config = Config::for_testing(&mock_server.uri(), "unused");
    let client = ArxivClient::new(&config).unwrap();
    let observer = Arc::new(CollectingObserver::new());

    let watcher = Watcher::new(&config, client, MemoryStore::new())
        .unwrap()
        .with_observer(observer.clone());
    watcher.run_once().await.unwrap();

    assert_eq!(observer.skip_reasons(), vec![SkipReason::MissingLink]);
    assert_eq!(watcher.store().snapshot().len(), 3);
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_corrupt_state_aborts_before_fetch() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, 0).await;
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_testing(&mock_server.uri(), dir.path());
    fs::write(config.seen_path(), "{not json").unwrap();

    let err = watcher(&config).run_once().await.unwrap_err();

    assert!(err.is_corrupt_state());
    assert_eq!(fs::read_to_string(config.seen_path()).unwrap(), "{not json");
}

#[tokio::test]
async fn test_empty_terms_is_config_error() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, 0).await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::for_testing(&mock_server.uri(), dir.path());
    config.search_terms.clear();

    let err = watcher(&config).run_once().await.unwrap_err();
    assert!(matches!(err, WatchError::Config(_)));
}

#[tokio::test]
async fn test_held_lock_blocks_run() {
    let mock_server = MockServer::start().await;
    mount_fixture(&mock_server, 0).await;
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_testing(&mock_server.uri(), dir.path());
    let watcher = watcher(&config);

    let _held = JsonFileStore::in_dir(dir.path()).lock().unwrap();
    let err = watcher.run_once().await.unwrap_err();

    assert!(matches!(err, WatchError::State(StateError::Locked { .. })));
}

#[tokio::test]
async fn test_fetch_failure_leaves_state_untouched() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_testing(&mock_server.uri(), dir.path());
    fs::write(config.seen_path(), "[\n  \"a\"\n]").unwrap();

    let err = watcher(&config).run_once().await.unwrap_err();

    assert!(matches!(err, WatchError::Transport(_)));
    assert_eq!(fs::read_to_string(config.seen_path()).unwrap(), "[\n  \"a\"\n]");
}

#[test]
fn test_invalid_search_url_rejected() {
    let mut config = Config::default();
    config.search_url = "not a url".into();
    assert!(Watcher::from_config(&config).is_err());
}
