use crate::support::{Task, remote_for, task};

use data_core::remote::HttpDataSourceBuilder;
use data_core::{DataSource, HttpDataSource, ManualConnectivity, RemoteConfig};

use common::RedactedApiKey;
use models::{ErrorKind, Query};

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn given_query_when_get_all_matching_then_constraints_become_url_parameters() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(query_param("done", "false"))
        .and(query_param("title", "write docs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{ "id": 1, "title": "write docs", "done": false }])),
        )
        .expect(1)
        .mount(&server)
        .await;
    let remote = remote_for(&server);

    // WHEN
    let response = remote
        .query()
        .where_eq("title", "write docs")
        .where_eq("done", false)
        .find_all()
        .await;

    // THEN
    assert_eq!(response.result(), Some(&vec![task(1, "write docs", false)]));
}

/// **VALUE**: Verifies a well-formed error body becomes a server error envelope.
///
/// **BUG THIS CATCHES**: Would catch non-2xx statuses being decoded as data.
#[tokio::test]
async fn given_error_status_with_error_body_when_get_all_then_server_error() {
    // GIVEN
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "errorCode": 1003,
            "errorMessage": "forbidden",
            "errors": [{ "errorCode": 1003, "errorMessage": "forbidden" }]
        })))
        .mount(&server)
        .await;

    // WHEN
    let response = remote_for(&server).get_all().await;

    // THEN
    let error = response.error().expect("request should fail");
    assert!(error.is_server_error());
    assert_eq!(error.kind(), ErrorKind::Server);
    assert_eq!(error.error_code(), 1003);
    assert_eq!(error.error_message(), "forbidden");
}

#[tokio::test]
async fn given_error_status_with_unknown_body_when_get_all_then_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let response = remote_for(&server).get_all().await;

    let error = response.error().expect("request should fail");
    assert!(!error.is_server_error());
    assert_eq!(error.kind(), ErrorKind::Parse);
}

#[tokio::test]
async fn given_undecodable_success_body_when_get_all_then_internal_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let response = remote_for(&server).get_all().await;

    let error = response.error().expect("decoding should fail");
    assert_eq!(error.kind(), ErrorKind::Internal);
    assert!(!error.is_server_error());
}

/// **VALUE**: Verifies the guard stops requests before they hit the network.
///
/// **WHY THIS MATTERS**: Offline requests would otherwise wait for the full
/// transport timeout before failing.
///
/// **BUG THIS CATCHES**: Would catch the probe being consulted after sending.
#[tokio::test]
async fn given_offline_device_when_any_call_made_then_no_request_is_sent() {
    // GIVEN: A server that must never be contacted
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let remote: HttpDataSource<Task> = HttpDataSource::builder(server.uri())
        .probe(Arc::new(ManualConnectivity::new(false)))
        .build()
        .unwrap();

    // WHEN
    let read = remote.get_all().await;
    let write = remote.save(&task(1, "offline", false)).await;

    // THEN
    assert_eq!(read.error().map(|e| e.kind()), Some(ErrorKind::Connectivity));
    assert_eq!(write.unwrap_err().kind(), ErrorKind::Connectivity);
    server.verify().await;
}

#[tokio::test]
async fn given_item_when_saved_then_put_to_item_path_with_json_body() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/tasks/5"))
        .and(body_json(json!({ "id": 5, "title": "ship", "done": true })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = remote_for(&server).save(&task(5, "ship", true)).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn given_items_when_saved_in_bulk_then_single_put_to_collection() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/tasks"))
        .and(body_json(json!([
            { "id": 1, "title": "a", "done": false },
            { "id": 2, "title": "b", "done": true }
        ])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let result = remote_for(&server)
        .save_all(&[task(1, "a", false), task(2, "b", true)])
        .await;

    assert!(result.is_ok());
}

/// **VALUE**: Verifies deleting something already gone counts as success.
///
/// **BUG THIS CATCHES**: Would catch a retry of a delete surfacing as an error.
#[tokio::test]
async fn given_item_already_deleted_when_removed_then_not_found_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/9"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;
    let remote = remote_for(&server);

    let first = remote.remove(&task(9, "gone", true)).await;
    let second = remote.remove_all(&[task(9, "gone", true)]).await;

    assert!(first.is_ok());
    assert!(second.is_ok());
}

#[tokio::test]
async fn given_server_failure_when_removed_then_error_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/9"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "errors": [{ "errorCode": 77, "errorMessage": "locked" }]
        })))
        .mount(&server)
        .await;

    let error = remote_for(&server)
        .remove(&task(9, "busy", false))
        .await
        .unwrap_err();

    assert_eq!(error.error_code(), 77);
    assert!(error.is_server_error());
}

#[tokio::test]
async fn given_token_when_request_sent_then_bearer_header_is_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(header("authorization", "Bearer s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let remote: HttpDataSource<Task> = HttpDataSource::builder(server.uri())
        .bearer_token(RedactedApiKey::new("s3cret".to_string()))
        .build()
        .unwrap();

    let response = remote.get_all_matching(&Query::new()).await;

    assert_eq!(response.result(), Some(&Vec::new()));
}

#[tokio::test]
async fn given_single_path_when_get_one_then_it_is_requested_directly() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks/current"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 3, "title": "now", "done": false })),
        )
        .mount(&server)
        .await;
    let remote: HttpDataSource<Task> = HttpDataSource::builder(server.uri())
        .single("tasks/current")
        .build()
        .unwrap();

    let response = remote.get_one().await;

    assert_eq!(response.result(), Some(&task(3, "now", false)));
}

#[tokio::test]
async fn given_empty_collection_when_get_one_then_not_found_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let response = remote_for(&server).get_one().await;

    let error = response.error().expect("nothing to return");
    assert!(error.is_server_error());
    assert_eq!(error.error_code(), 404);
}

#[tokio::test]
async fn given_remote_config_when_building_then_base_url_and_collection_are_used() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/todo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;
    let config = RemoteConfig {
        base_url: format!("{}/api", server.uri()),
        timeout_secs: 5,
        api_token_env: None,
    };

    let remote: HttpDataSource<Task> = HttpDataSourceBuilder::from_config(&config)
        .collection("/todo/")
        .build()
        .unwrap();
    let response = remote.get_all().await;

    assert!(response.is_successful());
    assert_eq!(remote.base_url().as_str(), format!("{}/api/", server.uri()));
}
