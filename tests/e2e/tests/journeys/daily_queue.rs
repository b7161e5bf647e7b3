//! Journey: opening a group's quiz and getting today's queue

use chrono::{Duration, FixedOffset, TimeZone, Utc};
use quiz_srs_core::GroupProgress;
use quiz_srs_core::session::order_reviews_first;
use quiz_srs_e2e_tests::{TestDataFactory, TestDatabaseManager};

#[tokio::test]
async fn test_overdue_first_and_tomorrow_excluded() {
    // 23:30, so one hour later is already tomorrow
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 23, 30, 0).unwrap();
    let db = TestDatabaseManager::new_temp_at(now);

    TestDataFactory::seed_due(&*db.store, "t+1h", "SE-0010", now + Duration::hours(1), 1);
    TestDataFactory::seed_due(&*db.store, "t-1d", "SE-0010", now - Duration::days(1), 1);
    TestDataFactory::seed_due(&*db.store, "t-3d", "SE-0010", now - Duration::days(3), 1);

    let queue = db.scheduler.generate_daily_queue(Some("SE-0010")).await.unwrap();
    assert_eq!(queue.review_items, vec!["t-3d", "t-1d"]);
    assert!(queue.new_items.is_empty());
    assert_eq!(queue.new_items_target, 1);
}

#[tokio::test]
async fn test_later_today_follows_overdue() {
    let db = TestDatabaseManager::new_temp();
    let now = db.now();

    TestDataFactory::seed_due(&*db.store, "t+1h", "SE-0010", now + Duration::hours(1), 1);
    TestDataFactory::seed_due(&*db.store, "t-1d", "SE-0010", now - Duration::days(1), 1);
    TestDataFactory::seed_due(&*db.store, "t-3d", "SE-0010", now - Duration::days(3), 1);
    TestDataFactory::seed_due(&*db.store, "elsewhere", "SE-0011", now - Duration::days(9), 1);

    let queue = db.scheduler.generate_daily_queue(Some("SE-0010")).await.unwrap();
    assert_eq!(queue.review_items, vec!["t-3d", "t-1d", "t+1h"]);

    let everything = db.scheduler.generate_daily_queue(None).await.unwrap();
    assert_eq!(everything.review_items.first().map(String::as_str), Some("elsewhere"));
    assert_eq!(everything.review_items.len(), 4);
}

#[tokio::test]
async fn test_calendar_day_follows_configured_offset() {
    // 14:00 UTC is 23:00 in Tokyo; 16:00 UTC is already tomorrow there
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 14, 0, 0).unwrap();
    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    let db = TestDatabaseManager::new_temp_with(now, tokyo);

    TestDataFactory::seed_due(&*db.store, "tonight", "SE-0012", now + Duration::minutes(30), 1);
    TestDataFactory::seed_due(&*db.store, "after-midnight", "SE-0012", now + Duration::hours(2), 1);

    let queue = db.scheduler.generate_daily_queue(Some("SE-0012")).await.unwrap();
    assert_eq!(queue.review_items, vec!["tonight"]);

    let stats = db.scheduler.get_review_stats("SE-0012").await.unwrap();
    assert_eq!(stats.due_today_count, 1);
    assert_eq!(stats.next_review_date, Some(now + Duration::minutes(30)));
}

#[tokio::test]
async fn test_earlier_today_counts_as_overdue_only() {
    // Default start is noon, so both items fall on today
    let db = TestDatabaseManager::new_temp();
    let now = db.now();

    TestDataFactory::seed_due(&*db.store, "this-morning", "SE-0014", now - Duration::hours(1), 1);
    let stats = db.scheduler.get_review_stats("SE-0014").await.unwrap();
    assert_eq!(stats.overdue_count, 1);
    assert_eq!(stats.due_today_count, 0);

    let progress = GroupProgress::new("SE-0014", 1, 4, 1).with_review_stats(stats);
    assert!(progress.has_overdue_reviews());
    assert!(!progress.has_due_today_reviews());

    TestDataFactory::seed_due(&*db.store, "this-evening", "SE-0014", now + Duration::hours(1), 1);
    let stats = db.scheduler.get_review_stats("SE-0014").await.unwrap();
    assert_eq!(stats.overdue_count, 1);
    assert_eq!(stats.due_today_count, 1);

    let queue = db.scheduler.generate_daily_queue(Some("SE-0014")).await.unwrap();
    assert_eq!(queue.review_items, vec!["this-morning", "this-evening"]);
}

#[tokio::test]
async fn test_new_item_target_and_review_first_ordering() {
    let db = TestDatabaseManager::new_temp();
    let now = db.now();
    let mut items = TestDataFactory::quiz_group("SE-0013", 12);

    // Every third question is overdue
    for item in items.iter().filter(|i| i.index % 3 == 2) {
        TestDataFactory::seed_due(&*db.store, &item.id, &item.group_id, now - Duration::hours(item.index as i64 + 1), 2);
    }

    let state = db.recorder().load_group("SE-0013").await.unwrap();
    assert_eq!(state.queue.review_items.len(), 4);
    assert_eq!(state.queue.new_items_target, 1);
    assert_eq!(state.stats.overdue_count, 4);

    order_reviews_first(&mut items, &state.queue, |item| item.id.as_str());
    let order: Vec<usize> = items.iter().map(|i| i.index).collect();
    assert_eq!(order, vec![2, 5, 8, 11, 0, 1, 3, 4, 6, 7, 9, 10]);
}

#[tokio::test]
async fn test_due_reviews_span_groups_once() {
    let db = TestDatabaseManager::new_temp();
    let now = db.now();
    for group in ["SE-0020", "SE-0021", "SE-0022"] {
        TestDataFactory::seed_due(&*db.store, &format!("{group}-a"), group, now - Duration::days(1), 1);
        TestDataFactory::seed_due(&*db.store, &format!("{group}-b"), group, now + Duration::days(1), 1);
    }

    let due = db.scheduler.get_due_reviews(now).await.unwrap();
    assert_eq!(due, vec!["SE-0020-a", "SE-0021-a", "SE-0022-a"]);

    let reminder = db.scheduler.due_reminder().await.unwrap().unwrap();
    assert_eq!(reminder.due_count, 3);

    let later = db.scheduler.get_due_reviews(now + Duration::days(2)).await.unwrap();
    assert_eq!(later.len(), 6);
}
