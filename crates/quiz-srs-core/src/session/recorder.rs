//! Answer recorder used by quiz front ends.
//!
//! Scheduling is auxiliary to answering a quiz: every failure here is logged
//! and swallowed so the quiz itself keeps working.

use std::collections::HashSet;
use std::sync::Arc;

use crate::schedule::{ReviewSchedule, quality_from_correct};
use crate::scheduler::{DailyReviewQueue, ReviewStats, SrsScheduler};

/// Result of recording one answer
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedAnswer {
    pub schedule: ReviewSchedule,
    /// Refreshed stats of the answered item's group, `None` if the refresh failed
    pub stats: Option<ReviewStats>,
}

/// Queue and stats loaded when a group's quiz opens
#[derive(Debug, Clone, PartialEq)]
pub struct GroupReviewState {
    pub queue: DailyReviewQueue,
    pub stats: ReviewStats,
}

/// Log-and-continue facade over the scheduler
#[derive(Clone)]
pub struct ReviewRecorder {
    scheduler: Arc<SrsScheduler>,
}

impl ReviewRecorder {
    pub fn new(scheduler: Arc<SrsScheduler>) -> Self {
        Self { scheduler }
    }

    pub fn scheduler(&self) -> &Arc<SrsScheduler> {
        &self.scheduler
    }

    /// Record a binary answer (correct = quality 5, incorrect = quality 0)
    pub async fn record_answer(
        &self,
        item_id: &str,
        group_id: &str,
        correct: bool,
    ) -> Option<RecordedAnswer> {
        let quality = quality_from_correct(correct);
        let schedule = match self
            .scheduler
            .update_schedule_after_review(item_id, group_id, quality)
            .await
        {
            Ok(schedule) => schedule,
            Err(e) => {
                tracing::warn!(item_id, group_id, error = %e, "Failed to update review schedule");
                return None;
            }
        };

        let stats = match self.scheduler.get_review_stats(&schedule.group_id).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                tracing::warn!(group_id = %schedule.group_id, error = %e, "Failed to refresh review stats");
                None
            }
        };

        Some(RecordedAnswer { schedule, stats })
    }

    /// Queue and stats for a group, `None` if either could not be loaded
    pub async fn load_group(&self, group_id: &str) -> Option<GroupReviewState> {
        let loaded = tokio::try_join!(
            self.scheduler.generate_daily_queue(Some(group_id)),
            self.scheduler.get_review_stats(group_id),
        );
        match loaded {
            Ok((queue, stats)) => Some(GroupReviewState { queue, stats }),
            Err(e) => {
                tracing::warn!(group_id, error = %e, "Failed to load review data");
                None
            }
        }
    }

    /// Drop every schedule of the group; `None` if the reset failed
    pub async fn reset_group(&self, group_id: &str) -> Option<usize> {
        match self.scheduler.delete_schedules(group_id).await {
            Ok(removed) => Some(removed),
            Err(e) => {
                tracing::warn!(group_id, error = %e, "Failed to delete review schedules");
                None
            }
        }
    }
}

/// Stable reorder putting items in the review queue first
///
/// Items keep their relative order within the "review" and "other" partitions.
pub fn order_reviews_first<T>(
    items: &mut [T],
    queue: &DailyReviewQueue,
    item_id: impl Fn(&T) -> &str,
) {
    if queue.review_items.is_empty() {
        return;
    }
    let due: HashSet<&str> = queue.review_items.iter().map(String::as_str).collect();
    items.sort_by_key(|item| !due.contains(item_id(item)));
}
