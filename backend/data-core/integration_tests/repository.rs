use crate::support::{Task, remote_for, task};

use data_core::{DataSource, HttpDataSource, LocalStore, ManualConnectivity, Repository};

use models::{ErrorKind, UNKNOWN_ERROR_CODE};

use std::sync::Arc;

use futures_util::StreamExt;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// **VALUE**: Full offline-first cycle over a real SQLite file and HTTP.
///
/// **WHY THIS MATTERS**: This is the flow every screen goes through: show the cache,
/// show the server answer, persist it for the next launch.
///
/// **BUG THIS CATCHES**: Would catch any adapter disagreeing with the repository on
/// envelope semantics, or the write-through never reaching disk.
#[tokio::test]
async fn given_cached_rows_and_live_server_when_get_all_then_cache_then_fresh_then_persisted() {
    // GIVEN: One stale row on disk and a server with two fresh ones
    let dir = TempDir::new().unwrap();
    let store = LocalStore::open(dir.path().join("repository.db")).unwrap();
    let local = Arc::new(store.data_source::<Task>().unwrap());
    local.save(&task(1, "draft", false)).await.unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "title": "draft", "done": true },
            { "id": 2, "title": "review", "done": false }
        ])))
        .expect(1)
        .mount(&server)
        .await;
    let repository = Repository::new(Arc::new(remote_for(&server)), local.clone());

    // WHEN
    let emissions: Vec<_> = repository.get_all().collect().await;
    repository.flush_write_throughs().await;

    // THEN: Cached first, fresh second
    assert_eq!(emissions.len(), 2);
    assert_eq!(emissions[0].result(), Some(&vec![task(1, "draft", false)]));
    let fresh = vec![task(1, "draft", true), task(2, "review", false)];
    assert_eq!(emissions[1].result(), Some(&fresh));

    // AND: The database holds the fresh rows
    assert_eq!(local.get_all().await.into_result().unwrap(), fresh);
}

/// **VALUE**: Verifies the first launch without network.
///
/// **BUG THIS CATCHES**: Would catch the repository hanging or panicking when
/// neither store can answer.
#[tokio::test]
async fn given_empty_database_and_no_network_when_get_all_then_two_unsuccessful_envelopes() {
    // GIVEN
    let store = LocalStore::open_in_memory().unwrap();
    let local = Arc::new(store.data_source::<Task>().unwrap());
    let server = MockServer::start().await;
    let remote: HttpDataSource<Task> = HttpDataSource::builder(server.uri())
        .probe(Arc::new(ManualConnectivity::new(false)))
        .build()
        .unwrap();
    let repository = Repository::new(Arc::new(remote), local);

    // WHEN
    let emissions: Vec<_> = repository.get_all().collect().await;

    // THEN
    let first = emissions[0].error().expect("cache is empty");
    assert_eq!(first.error_code(), UNKNOWN_ERROR_CODE);
    assert!(!first.is_server_error());

    let second = emissions[1].error().expect("device is offline");
    assert_eq!(second.error_code(), UNKNOWN_ERROR_CODE);
    assert!(second.is_server_error());
    assert_eq!(second.kind(), ErrorKind::Connectivity);
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn given_server_rejecting_read_when_fetch_all_then_server_message_is_reported() {
    // GIVEN
    let store = LocalStore::open_in_memory().unwrap();
    let local = Arc::new(store.data_source::<Task>().unwrap());
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errorMessage": "session expired",
            "errors": [{ "errorCode": 401 }]
        })))
        .mount(&server)
        .await;
    let repository: Repository<Task> = Repository::new(Arc::new(remote_for(&server)), local.clone());

    // WHEN
    let response = repository.fetch_all().await;
    repository.flush_write_throughs().await;

    // THEN
    let error = response.error().expect("server rejected the read");
    assert!(error.is_server_error());
    assert_eq!(error.kind(), ErrorKind::Server);
    assert_eq!(error.error_message(), "session expired");
    assert!(local.get_all().await.into_result().unwrap().is_empty());
}
