//! Per-group review statistics.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::{DEFAULT_EASE_FACTOR, MasteryLevelCounts, ReviewSchedule};

/// Aggregate review state of one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub group_id: String,
    /// Sum of lifetime review counts across the group's schedules
    pub total_reviews: u64,
    pub overdue_count: usize,
    pub due_today_count: usize,
    /// Mean ease factor, 2.5 for an empty group
    pub average_ease_factor: f64,
    pub mastery_level_counts: MasteryLevelCounts,
    /// Earliest due date that is not yet overdue
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub next_review_date: Option<DateTime<Utc>>,
}

impl ReviewStats {
    /// Zeroed stats for a group with no schedules
    pub fn empty(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            total_reviews: 0,
            overdue_count: 0,
            due_today_count: 0,
            average_ease_factor: DEFAULT_EASE_FACTOR,
            mastery_level_counts: MasteryLevelCounts::default(),
            next_review_date: None,
        }
    }

    /// Aggregate the schedules tagged with `group_id`; others are skipped
    pub fn from_schedules<'a>(
        group_id: &str,
        schedules: impl IntoIterator<Item = &'a ReviewSchedule>,
        now: DateTime<Utc>,
        tz: &FixedOffset,
    ) -> Self {
        let mut stats = Self::empty(group_id);
        let mut ease_sum = 0.0;
        let mut count = 0usize;

        for schedule in schedules.into_iter().filter(|s| s.group_id == group_id) {
            count += 1;
            ease_sum += schedule.ease_factor;
            stats.total_reviews += u64::from(schedule.review_count);
            stats.mastery_level_counts.increment(schedule.mastery_level());

            if schedule.is_overdue(now) {
                stats.overdue_count += 1;
            } else if schedule.is_due_today(now, tz) {
                stats.due_today_count += 1;
            }
            if schedule.next_review_due_at >= now {
                let due = schedule.next_review_due_at;
                stats.next_review_date = Some(match stats.next_review_date {
                    Some(current) => current.min(due),
                    None => due,
                });
            }
        }

        if count > 0 {
            stats.average_ease_factor = ease_sum / count as f64;
        }
        stats
    }

    /// Weighted mastery in [0, 100]: learning 0, reviewing 33, familiar 66, mastered 100
    pub fn mastery_score(&self) -> f64 {
        if self.total_reviews == 0 {
            return 0.0;
        }
        self.mastery_level_counts.weighted_score()
    }

    /// Whether the group has any schedule at all
    pub fn has_schedules(&self) -> bool {
        self.mastery_level_counts.total() > 0
    }
}
