//! Journey: group statistics, progress and reset

use chrono::Duration;
use quiz_srs_core::{GroupProgress, MasteryLevel, ProgressStatus};
use quiz_srs_e2e_tests::{TestDataFactory, TestDatabaseManager};

#[tokio::test]
async fn test_empty_group_stats() {
    let db = TestDatabaseManager::new_temp();
    let stats = db.scheduler.get_review_stats("SE-0100").await.unwrap();

    assert_eq!(stats.total_reviews, 0);
    assert_eq!(stats.overdue_count, 0);
    assert_eq!(stats.due_today_count, 0);
    assert_eq!(stats.average_ease_factor, 2.5);
    assert!(stats.next_review_date.is_none());
    assert_eq!(stats.mastery_score(), 0.0);
}

#[tokio::test]
async fn test_one_schedule_per_tier() {
    let db = TestDatabaseManager::new_temp();
    TestDataFactory::mastery_ladder(&*db.store, "SE-0101", db.now());

    let stats = db.scheduler.get_review_stats("SE-0101").await.unwrap();
    for level in MasteryLevel::ALL {
        assert_eq!(stats.mastery_level_counts.get(level), 1);
    }
    assert!((stats.mastery_score() - 49.75).abs() < 1e-9);
    assert_eq!(stats.next_review_date, Some(db.now() + Duration::days(2)));
}

#[tokio::test]
async fn test_progress_tracks_answers() {
    let db = TestDatabaseManager::new_temp();
    let recorder = db.recorder();
    let items = TestDataFactory::quiz_group("SE-0102", 4);

    let mut answered = 0;
    let mut correct = 0;
    for (item, is_correct) in items.iter().take(3).zip([true, false, true]) {
        recorder.record_answer(&item.id, &item.group_id, is_correct).await.unwrap();
        answered += 1;
        correct += usize::from(is_correct);
    }

    let stats = db.scheduler.get_review_stats("SE-0102").await.unwrap();
    let progress = GroupProgress::new("SE-0102", answered, items.len(), correct).with_review_stats(stats);

    assert_eq!(progress.status(), ProgressStatus::InProgress);
    assert_eq!(progress.progress_percentage(), 75.0);
    assert!((progress.accuracy_percentage() - 200.0 / 3.0).abs() < 1e-9);
    assert!(!progress.has_overdue_reviews());

    // Two correct at streak 1 (reviewing), one lapse (learning)
    let expected = (33.0 * 2.0) / 3.0;
    assert!((progress.mastery_score().unwrap() - expected).abs() < 1e-9);

    // Two days later everything is overdue
    db.clock.advance(Duration::days(2));
    let stats = db.scheduler.get_review_stats("SE-0102").await.unwrap();
    let progress = progress.with_review_stats(stats);
    assert!(progress.has_overdue_reviews());
}

#[tokio::test]
async fn test_reset_leaves_other_groups_alone() {
    let db = TestDatabaseManager::new_temp();
    let recorder = db.recorder();

    for item in TestDataFactory::quiz_group("SE-0103", 3) {
        recorder.record_answer(&item.id, &item.group_id, true).await.unwrap();
    }
    let keep = TestDataFactory::quiz_group("SE-0104", 2);
    for item in &keep {
        recorder.record_answer(&item.id, &item.group_id, false).await.unwrap();
    }
    let kept_before = db.scheduler.get_schedule(&keep[0].id).await.unwrap();

    assert_eq!(recorder.reset_group("SE-0103").await, Some(3));

    let remaining = db.scheduler.get_all_schedules().await.unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.values().all(|s| s.group_id == "SE-0104"));
    assert_eq!(db.scheduler.get_schedule(&keep[0].id).await.unwrap(), kept_before);

    let stats = db.scheduler.get_review_stats("SE-0103").await.unwrap();
    assert_eq!(stats.total_reviews, 0);

    // Resetting again is a no-op
    assert_eq!(recorder.reset_group("SE-0103").await, Some(0));
}
