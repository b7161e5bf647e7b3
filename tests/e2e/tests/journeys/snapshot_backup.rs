//! Journey: moving schedules between installs

use quiz_srs_core::scheduler::ScheduleSnapshot;
use quiz_srs_core::{ScheduleStore, SqliteScheduleStore, SrsError};
use quiz_srs_e2e_tests::{TestDataFactory, TestDatabaseManager};

async fn study(db: &TestDatabaseManager, group: &str, count: usize) {
    let recorder = db.recorder();
    for (i, item) in TestDataFactory::quiz_group(group, count).iter().enumerate() {
        recorder.record_answer(&item.id, &item.group_id, i % 2 == 0).await.unwrap();
    }
}

#[tokio::test]
async fn test_export_import_into_fresh_install() {
    let source = TestDatabaseManager::new_temp();
    study(&source, "SE-0200", 6).await;
    study(&source, "SE-0201", 3).await;

    let json = source.scheduler.export_snapshot().await.unwrap().to_json().unwrap();

    let target = source.sibling();
    TestDataFactory::seed_due(&*target.store, "stale", "SE-0999", target.now(), 1);

    let snapshot = ScheduleSnapshot::from_json(&json).unwrap();
    assert_eq!(target.scheduler.import_snapshot(snapshot).await.unwrap(), 9);

    assert_eq!(
        target.scheduler.get_all_schedules().await.unwrap(),
        source.scheduler.get_all_schedules().await.unwrap()
    );
    assert_eq!(
        target.scheduler.get_review_stats("SE-0200").await.unwrap(),
        source.scheduler.get_review_stats("SE-0200").await.unwrap()
    );
}

#[tokio::test]
async fn test_snapshot_json_is_keyed_by_item_id() {
    let db = TestDatabaseManager::new_temp();
    db.scheduler.update_schedule_after_review("q1", "SE-0202", 5).await.unwrap();

    let json = db.scheduler.export_snapshot().await.unwrap().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["version"], 1);
    let record = &value["schedules"]["q1"];
    assert_eq!(record["itemId"], "q1");
    assert_eq!(record["groupId"], "SE-0202");
    assert_eq!(record["reviewCount"], 1);
    assert_eq!(record["lastReviewedAt"], db.now().timestamp_millis());
    assert!(record["easeFactor"].is_f64());
}

#[tokio::test]
async fn test_invalid_snapshot_leaves_table_intact() {
    let db = TestDatabaseManager::new_temp();
    study(&db, "SE-0203", 4).await;
    let before = db.scheduler.get_all_schedules().await.unwrap();

    let mut snapshot = db.scheduler.export_snapshot().await.unwrap();
    if let Some(first) = snapshot.schedules.values_mut().next() {
        first.ease_factor = 0.5;
    }
    let err = db.scheduler.import_snapshot(snapshot).await.unwrap_err();
    assert!(matches!(err, SrsError::InvalidSnapshot(_)));

    let mut wrong_version = db.scheduler.export_snapshot().await.unwrap();
    wrong_version.version = 2;
    assert!(db.scheduler.import_snapshot(wrong_version).await.is_err());

    assert_eq!(db.scheduler.get_all_schedules().await.unwrap(), before);
}

#[tokio::test]
async fn test_backup_file_opens_as_store() {
    let db = TestDatabaseManager::new_temp();
    study(&db, "SE-0204", 3).await;

    let backup_path = db.dir().join("backup.db");
    db.store.backup_to(&backup_path).unwrap();

    let restored = SqliteScheduleStore::new(Some(backup_path)).unwrap();
    assert_eq!(restored.get_all().unwrap(), db.store.get_all().unwrap());
    assert_eq!(restored.count().unwrap(), 3);
}
