use crate::data_source::DataSource;
use crate::local::InMemoryDataSource;
use crate::tests::support::{Note, note};

use models::{ErrorKind, Query};

#[tokio::test]
async fn given_in_memory_store_when_filtered_then_semantics_match_sqlite() {
    let source = InMemoryDataSource::with_records(vec![
        note("1", "alice", false, 1),
        note("2", "alice", true, 2),
    ]);

    let open = source
        .get_all_matching(&Query::new().where_eq("archived", false))
        .await
        .into_result()
        .unwrap();
    let rejected = source
        .get_all_matching(&Query::new().where_eq("a.b", "x"))
        .await;

    assert_eq!(open, vec![note("1", "alice", false, 1)]);
    assert_eq!(rejected.error().map(|e| e.kind()), Some(ErrorKind::Db));
}

#[tokio::test]
async fn given_in_memory_store_when_saved_and_removed_then_upsert_and_no_op_hold() {
    let source: InMemoryDataSource<Note> = InMemoryDataSource::new();

    source.save(&note("1", "alice", false, 1)).await.unwrap();
    source.save(&note("1", "alice", true, 1)).await.unwrap();
    source.remove(&note("2", "bob", false, 1)).await.unwrap();

    assert_eq!(source.len(), 1);
    assert_eq!(
        source.get_one().await.into_result().unwrap(),
        note("1", "alice", true, 1)
    );

    source.remove_all(&[note("1", "alice", true, 1)]).await.unwrap();
    assert!(source.is_empty());
    assert_eq!(
        source.get_one().await.error().map(|e| e.kind()),
        Some(ErrorKind::NoData)
    );
}
