use crate::data_source::DataSource;
use crate::local::LocalStore;
use crate::tests::support::{Note, note};

use models::{ErrorKind, Query};

use tempfile::TempDir;

fn notes() -> Vec<Note> {
    vec![
        note("1", "alice", false, 1),
        note("2", "alice", true, 2),
        note("3", "bob", false, 2),
    ]
}

#[tokio::test]
async fn given_saved_items_when_get_all_then_items_are_returned_in_id_order() {
    // GIVEN
    let store = LocalStore::open_in_memory().unwrap();
    let source = store.data_source::<Note>().unwrap();
    source
        .save_all(&[note("2", "bob", false, 1), note("1", "alice", false, 1)])
        .await
        .unwrap();

    // WHEN
    let items = source.get_all().await.into_result().unwrap();

    // THEN
    let ids: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
}

#[tokio::test]
async fn given_existing_id_when_saved_again_then_row_is_replaced() {
    let store = LocalStore::open_in_memory().unwrap();
    let source = store.data_source::<Note>().unwrap();

    source.save(&note("1", "alice", false, 1)).await.unwrap();
    source.save(&note("1", "alice", true, 5)).await.unwrap();

    let items = source.get_all().await.into_result().unwrap();
    assert_eq!(items, vec![note("1", "alice", true, 5)]);
}

/// **VALUE**: Verifies the query builder filters with AND across text, bool and
/// integer fields.
///
/// **BUG THIS CATCHES**: Would catch booleans being compared as `1`/`0` by SQLite,
/// which would make `archived = false` match nothing.
#[tokio::test]
async fn given_query_when_get_all_matching_then_all_constraints_apply() {
    // GIVEN
    let store = LocalStore::open_in_memory().unwrap();
    let source = store.data_source::<Note>().unwrap();
    source.save_all(&notes()).await.unwrap();

    // WHEN
    let alice_open = source
        .get_all_matching(&Query::new().where_eq("owner", "alice").where_eq("archived", false))
        .await
        .into_result()
        .unwrap();
    let priority_two = source
        .query()
        .where_eq("priority", 2)
        .find_all()
        .await
        .into_result()
        .unwrap();
    let everything = source.get_all_matching(&Query::new()).await.into_result().unwrap();

    // THEN
    assert_eq!(alice_open, vec![note("1", "alice", false, 1)]);
    assert_eq!(priority_two.len(), 2);
    assert_eq!(everything.len(), 3);
}

#[tokio::test]
async fn given_no_match_when_get_all_matching_then_empty_success() {
    let store = LocalStore::open_in_memory().unwrap();
    let source = store.data_source::<Note>().unwrap();
    source.save_all(&notes()).await.unwrap();

    let response = source
        .get_all_matching(&Query::new().where_eq("owner", "nobody"))
        .await;

    assert_eq!(response.result(), Some(&Vec::new()));
}

#[tokio::test]
async fn given_invalid_field_when_queried_then_db_error_is_returned() {
    let store = LocalStore::open_in_memory().unwrap();
    let source = store.data_source::<Note>().unwrap();

    let response = source
        .get_all_matching(&Query::new().where_eq("owner OR 1=1", "x"))
        .await;

    let error = response.error().unwrap();
    assert_eq!(error.kind(), ErrorKind::Db);
    assert!(!error.is_server_error());
}

#[tokio::test]
async fn given_empty_table_when_get_one_then_no_data() {
    let store = LocalStore::open_in_memory().unwrap();
    let source = store.data_source::<Note>().unwrap();

    let response = source.get_one().await;

    assert_eq!(response.error().map(|e| e.kind()), Some(ErrorKind::NoData));
}

#[tokio::test]
async fn given_missing_item_when_removed_then_call_is_a_no_op() {
    let store = LocalStore::open_in_memory().unwrap();
    let source = store.data_source::<Note>().unwrap();
    source.save_all(&notes()).await.unwrap();

    source.remove(&note("3", "bob", false, 2)).await.unwrap();
    source.remove(&note("3", "bob", false, 2)).await.unwrap();
    source.remove_all(&[note("404", "x", false, 0)]).await.unwrap();

    assert_eq!(source.get_all().await.into_result().unwrap().len(), 2);
}

/// **VALUE**: Verifies data written through one connection is visible after reopening.
///
/// **WHY THIS MATTERS**: The whole point of the local store is to survive restarts.
#[tokio::test]
async fn given_database_file_when_reopened_then_rows_persist() {
    // GIVEN
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("repository.db");
    {
        let store = LocalStore::open(&path).unwrap();
        let source = store.data_source::<Note>().unwrap();
        source.save_all(&notes()).await.unwrap();
    }

    // WHEN
    let reopened = LocalStore::open(&path).unwrap();
    let source = reopened.data_source::<Note>().unwrap();

    // THEN
    assert_eq!(reopened.path(), Some(path.as_path()));
    assert_eq!(source.get_one().await.into_result().unwrap().id, "1");
    assert_eq!(source.get_all().await.into_result().unwrap().len(), 3);
}

#[test]
fn given_unwritable_path_when_opened_then_open_error() {
    let result = LocalStore::open("/dev/null/repository.db");

    assert!(result.is_err());
}
