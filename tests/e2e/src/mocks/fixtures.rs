//! Test Data Factory
//!
//! Provides utilities for generating realistic test data:
//! - Quiz groups with generated item ids
//! - Schedules seeded at chosen due dates and streaks
//! - Pre-built scenarios for common test cases

use chrono::{DateTime, Duration, Utc};
use quiz_srs_core::{ReviewSchedule, ScheduleStore};
use uuid::Uuid;

/// A quiz question as the consumer sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizItem {
    pub id: String,
    pub group_id: String,
    /// Position in the group's quiz list
    pub index: usize,
}

/// Factory for creating test data
///
/// # Example
///
/// ```rust,ignore
/// let items = TestDataFactory::quiz_group("SE-0296", 10);
/// TestDataFactory::seed_due(&*db.store, "q1", "SE-0296", now - Duration::days(1), 2);
/// ```
pub struct TestDataFactory;

impl TestDataFactory {
    /// Unique item id inside a group
    pub fn item_id(group_id: &str) -> String {
        format!("{}-{}", group_id, Uuid::new_v4())
    }

    /// `count` quiz items of one group, in index order
    pub fn quiz_group(group_id: &str, count: usize) -> Vec<QuizItem> {
        (0..count)
            .map(|index| QuizItem {
                id: Self::item_id(group_id),
                group_id: group_id.to_string(),
                index,
            })
            .collect()
    }

    /// Schedule with a given streak whose due date is forced to `due`
    pub fn schedule_due_at(
        item_id: &str,
        group_id: &str,
        due: DateTime<Utc>,
        consecutive_correct: u32,
    ) -> ReviewSchedule {
        let created = due - Duration::days(30);
        let mut schedule = ReviewSchedule::new(item_id, group_id, created);
        let mut reviewed_at = created;
        for _ in 0..consecutive_correct.max(1) {
            schedule = schedule.updated_after_review(5, reviewed_at);
            reviewed_at += Duration::days(1);
        }
        if consecutive_correct == 0 {
            schedule = schedule.updated_after_review(0, reviewed_at);
        }
        schedule.next_review_due_at = due;
        schedule
    }

    /// Store a schedule due at `due`
    pub fn seed_due(
        store: &dyn ScheduleStore,
        item_id: &str,
        group_id: &str,
        due: DateTime<Utc>,
        consecutive_correct: u32,
    ) -> ReviewSchedule {
        let schedule = Self::schedule_due_at(item_id, group_id, due, consecutive_correct);
        store.put(&schedule).expect("Failed to seed schedule");
        schedule
    }

    /// One schedule per mastery tier (streaks 0, 1, 3, 6), all due in two days
    pub fn mastery_ladder(
        store: &dyn ScheduleStore,
        group_id: &str,
        now: DateTime<Utc>,
    ) -> Vec<ReviewSchedule> {
        [0, 1, 3, 6]
            .into_iter()
            .map(|streak| {
                Self::seed_due(
                    store,
                    &Self::item_id(group_id),
                    group_id,
                    now + Duration::days(2),
                    streak,
                )
            })
            .collect()
    }
}
