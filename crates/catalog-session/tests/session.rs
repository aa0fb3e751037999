use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use catalog_engine::{ViewBody, ViewStatus};
use catalog_model::{FacetSpec, FieldValue, ListingSchema, Record, RecordId};
use catalog_session::{JsonFileSource, ListingSession, MemorySource, RecordSource, save_records};

fn schema() -> ListingSchema {
    ListingSchema::new("skilled-workers")
        .with_search_fields(&["name", "skill"])
        .with_facet(FacetSpec::ascending("region"))
}

fn worker(id: &str, name: &str, skill: &str, region: &str, day: u32) -> Record {
    Record::new(RecordId::new(id).unwrap())
        .with_field("name", name)
        .with_field("skill", skill)
        .with_field("region", region)
        .with_field("views", 0)
        .with_created_at(Utc.with_ymd_and_hms(2024, 5, day, 9, 0, 0).unwrap())
}

fn workers() -> Vec<Record> {
    vec![
        worker("w1", "Amina", "Plumbing", "North", 1),
        worker("w2", "Bola", "Electrical", "South", 3),
        worker("w3", "Chidi", "Plumbing", "South", 2),
    ]
}

fn flat_ids(session: &ListingSession<impl RecordSource>) -> Vec<String> {
    match session.view().body {
        ViewBody::Flat { records } => records.iter().map(|r| r.id.to_string()).collect(),
        ViewBody::Grouped { .. } => panic!("expected flat body"),
    }
}

#[tokio::test]
async fn refresh_loads_newest_first() {
    let mut session = ListingSession::new(schema(), MemorySource::new(workers())).unwrap();
    assert_eq!(session.view().status, ViewStatus::Loading);
    assert_eq!(session.refresh().await, 3);
    assert_eq!(session.view().status, ViewStatus::Ready);
    assert_eq!(flat_ids(&session), vec!["w2", "w3", "w1"]);
}

#[tokio::test]
async fn failed_fetch_settles_into_no_data() {
    let source = MemorySource::new(workers());
    source.set_fail_fetch(true);
    let mut session = ListingSession::new(schema(), source).unwrap();
    assert_eq!(session.refresh().await, 0);
    let view = session.view();
    assert_eq!(view.status, ViewStatus::NoData);
    assert_eq!(view.total_pages, 1);

    session.source().set_fail_fetch(false);
    assert_eq!(session.refresh().await, 3);
    assert_eq!(session.view().status, ViewStatus::Ready);
}

#[tokio::test(start_paused = true)]
async fn rapid_typing_commits_once_with_the_last_value() {
    let mut session = ListingSession::new(schema(), MemorySource::new(workers())).unwrap();
    session.refresh().await;

    session.on_keystroke("p");
    tokio::time::sleep(Duration::from_millis(100)).await;
    session.on_keystroke("pl");
    tokio::time::sleep(Duration::from_millis(100)).await;
    session.on_keystroke("plu");
    assert_eq!(session.drain_commits(), 0);
    assert_eq!(session.view().committed_query, "");

    assert!(session.settle_search().await);
    assert_eq!(session.view().committed_query, "plu");
    assert_eq!(flat_ids(&session), vec!["w3", "w1"]);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(session.drain_commits(), 0);
    assert!(!session.settle_search().await);
}

#[tokio::test(start_paused = true)]
async fn settle_applies_commits_scheduled_on_the_engine() {
    let mut session = ListingSession::new(schema(), MemorySource::new(workers())).unwrap();
    session.refresh().await;
    session.engine_mut().on_keystroke("bola", std::time::Instant::now());

    assert!(session.settle_search().await);
    assert_eq!(session.view().committed_query, "bola");
    assert_eq!(flat_ids(&session), vec!["w2"]);
    assert!(!session.settle_search().await);
}

#[tokio::test(start_paused = true)]
async fn clear_cancels_the_pending_commit() {
    let mut session = ListingSession::new(schema(), MemorySource::new(workers())).unwrap();
    session.refresh().await;
    session.on_keystroke("bola");
    session.on_clear();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(session.drain_commits(), 0);
    assert_eq!(session.view().total_filtered, 3);
    assert_eq!(session.view().raw_query, "");
}

#[tokio::test]
async fn submit_commits_without_waiting() {
    let mut session = ListingSession::new(schema(), MemorySource::new(workers())).unwrap();
    session.refresh().await;
    session.on_keystroke("electrical");
    assert!(session.submit_search());
    assert_eq!(flat_ids(&session), vec!["w2"]);
}

#[tokio::test]
async fn increment_is_written_through() {
    let mut session = ListingSession::new(schema(), MemorySource::new(workers())).unwrap();
    session.refresh().await;
    let id = RecordId::new("w3").unwrap();
    let handle = session.increment(&id, "views").unwrap();
    assert!(handle.await.unwrap());

    let local = session.engine().store().get(&id).unwrap();
    assert_eq!(local.get("views"), Some(&FieldValue::Integer(1)));
    let remote = session.source().get(&id).await.unwrap();
    assert_eq!(remote.get("views"), Some(&FieldValue::Integer(1)));
}

#[tokio::test]
async fn remote_failure_keeps_the_optimistic_value_once() {
    // The source never had w9, so the write fails remotely.
    let mut local = workers();
    local.push(worker("w9", "Dayo", "Carpentry", "North", 4));
    let source = Arc::new(MemorySource::new(workers()));
    let mut session = ListingSession::with_shared_source(schema(), Arc::clone(&source)).unwrap();
    session.engine_mut().finish_load(local);

    let id = RecordId::new("w9").unwrap();
    let handle = session.increment(&id, "views").unwrap();
    assert!(!handle.await.unwrap());
    assert_eq!(source.update_calls(), 1);

    let record = session.engine().store().get(&id).unwrap();
    assert_eq!(record.get("views"), Some(&FieldValue::Integer(1)));
}

#[tokio::test]
async fn double_click_counts_twice() {
    let source = Arc::new(MemorySource::new(workers()));
    let mut session = ListingSession::with_shared_source(schema(), Arc::clone(&source)).unwrap();
    session.refresh().await;
    let id = RecordId::new("w1").unwrap();
    let first = session.increment(&id, "views").unwrap();
    let second = session.increment(&id, "views").unwrap();
    assert!(first.await.unwrap());
    assert!(second.await.unwrap());
    assert_eq!(source.update_calls(), 2);

    let local = session.engine().store().get(&id).unwrap();
    assert_eq!(local.get("views"), Some(&FieldValue::Integer(2)));
}

#[tokio::test]
async fn unavailable_updates_do_not_roll_back() {
    let source = MemorySource::new(workers());
    source.set_fail_updates(true);
    let mut session = ListingSession::new(schema(), source).unwrap();
    session.refresh().await;
    let id = RecordId::new("w2").unwrap();
    let handle = session
        .update(&id, "region", FieldValue::text("North"))
        .unwrap();
    assert!(!handle.await.unwrap());
    session
        .engine_mut()
        .select_facet("region", Some(FieldValue::text("North")))
        .unwrap();
    assert_eq!(flat_ids(&session), vec!["w2", "w1"]);
}

#[tokio::test]
async fn json_file_source_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workers.json");
    save_records(&path, &workers()).unwrap();

    let mut session = ListingSession::new(schema(), JsonFileSource::new(&path)).unwrap();
    assert_eq!(session.refresh().await, 3);
    let id = RecordId::new("w1").unwrap();
    assert!(session.increment(&id, "views").unwrap().await.unwrap());

    let reread = JsonFileSource::new(&path).fetch_all().await.unwrap();
    let w1 = reread.iter().find(|r| r.id == id).unwrap();
    assert_eq!(w1.get("views"), Some(&FieldValue::Integer(1)));
}

#[tokio::test]
async fn unreadable_json_file_shows_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "[{\"id\": 5}]").unwrap();
    let mut session = ListingSession::new(schema(), JsonFileSource::new(&path)).unwrap();
    assert_eq!(session.refresh().await, 0);
    assert_eq!(session.view().status, ViewStatus::NoData);
}

#[tokio::test]
async fn nullable_and_float_columns_still_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workers.json");
    std::fs::write(
        &path,
        r#"[
            {"id": "w1", "name": "Amina", "region": null, "rating": 4.5, "verified": true},
            {"id": "w2", "name": "Bola", "region": "South", "rating": null, "verified": false}
        ]"#,
    )
    .unwrap();
    let mut session = ListingSession::new(schema(), JsonFileSource::new(&path)).unwrap();
    assert_eq!(session.refresh().await, 2);
    let view = session.view();
    assert_eq!(view.status, ViewStatus::Ready);
    assert_eq!(view.facets[0].values, vec![FieldValue::text("South")]);

    let w1 = session
        .engine()
        .store()
        .get(&RecordId::new("w1").unwrap())
        .unwrap();
    assert_eq!(w1.get("region"), None);
    assert_eq!(w1.get("rating"), Some(&FieldValue::Float(4.5)));
}
