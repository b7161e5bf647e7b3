//! Daily review queue.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::config::SchedulerConfig;
use crate::schedule::ReviewSchedule;

/// Items to review today plus the new-item allotment for the consumer to fill
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReviewQueue {
    /// Overdue items first, then items due later today, each oldest-due-first
    pub review_items: Vec<String>,
    /// Never populated by the scheduler; selection of unseen items is the consumer's job
    pub new_items: Vec<String>,
    /// How many new items the consumer should add alongside the reviews
    pub new_items_target: usize,
}

impl DailyReviewQueue {
    /// Build the queue from a set of schedules
    ///
    /// Overdue means `due < now`; due-today means `due >= now` and on the
    /// same calendar day as `now` in `tz`. Ties on the due instant break by item id.
    pub fn build<'a>(
        schedules: impl IntoIterator<Item = &'a ReviewSchedule>,
        now: DateTime<Utc>,
        tz: &FixedOffset,
        config: &SchedulerConfig,
    ) -> Self {
        let mut overdue: Vec<&ReviewSchedule> = Vec::new();
        let mut due_today: Vec<&ReviewSchedule> = Vec::new();

        for schedule in schedules {
            if schedule.is_overdue(now) {
                overdue.push(schedule);
            } else if schedule.is_due_today(now, tz) {
                due_today.push(schedule);
            }
        }

        let by_due = |a: &&ReviewSchedule, b: &&ReviewSchedule| {
            a.next_review_due_at
                .cmp(&b.next_review_due_at)
                .then_with(|| a.item_id.cmp(&b.item_id))
        };
        overdue.sort_by(by_due);
        due_today.sort_by(by_due);

        let review_items: Vec<String> = overdue
            .into_iter()
            .chain(due_today)
            .map(|s| s.item_id.clone())
            .collect();
        let new_items_target = config.new_items_target(review_items.len());

        Self {
            review_items,
            new_items: Vec::new(),
            new_items_target,
        }
    }

    /// Review items plus new items
    pub fn total_count(&self) -> usize {
        self.review_items.len() + self.new_items.len()
    }

    /// Share of the queue made of reviews, 0 for an empty queue
    pub fn review_ratio(&self) -> f64 {
        let total = self.total_count();
        if total == 0 {
            0.0
        } else {
            self.review_items.len() as f64 / total as f64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_count() == 0
    }
}
