//! SRS Scheduler Module
//!
//! Orchestrates schedule updates, due-item queries, daily queues and group
//! statistics on top of an injected `ScheduleStore` and `Clock`.
//!
//! Writes (`update_schedule_after_review`, `delete_schedules`,
//! `import_snapshot`) are serialized through one async write gate. Inside
//! the gate the read, the SM-2 update and the store write happen without an
//! `.await`, so a dropped future either applied nothing or applied the
//! whole write. Reads skip the gate.

mod queue;
mod reminder;
mod snapshot;
mod stats;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::clock::{Clock, SystemClock};
use crate::config::SchedulerConfig;
use crate::schedule::{QUALITY_CORRECT, QUALITY_INCORRECT, ReviewSchedule, is_valid_quality};
use crate::storage::{ScheduleStore, StorageError};

pub use queue::DailyReviewQueue;
pub use reminder::{DEFAULT_REMINDER_HOUR, ReviewReminder, next_reminder_at};
pub use snapshot::{SNAPSHOT_VERSION, ScheduleSnapshot};
pub use stats::ReviewStats;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Scheduler error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SrsError {
    /// Quality outside [0, 5]
    #[error("Invalid quality {0}: must be between 0 and 5")]
    InvalidQuality(i32),
    /// Operation needs an existing schedule
    #[error("No schedule for item '{0}'")]
    ScheduleNotFound(String),
    /// Store failure, propagated as-is
    #[error("Persistence error: {0}")]
    Persistence(#[from] StorageError),
    /// Snapshot rejected on import
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Scheduler result type
pub type Result<T> = std::result::Result<T, SrsError>;

// ============================================================================
// PREVIEW
// ============================================================================

/// Outcome of a correct and of an incorrect answer, computed without writing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPreview {
    pub correct: ReviewSchedule,
    pub incorrect: ReviewSchedule,
}

// ============================================================================
// SCHEDULER
// ============================================================================

/// Spaced-repetition scheduler service
pub struct SrsScheduler {
    store: Arc<dyn ScheduleStore>,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
    write_gate: Mutex<()>,
}

impl SrsScheduler {
    pub fn new(store: Arc<dyn ScheduleStore>, clock: Arc<dyn Clock>, config: SchedulerConfig) -> Self {
        Self {
            store,
            clock,
            config,
            write_gate: Mutex::new(()),
        }
    }

    /// Scheduler on the system clock with environment-derived config
    pub fn with_system_clock(store: Arc<dyn ScheduleStore>) -> Self {
        Self::new(store, Arc::new(SystemClock), SchedulerConfig::from_env())
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Current instant according to the injected clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Record one review of `item_id` and persist the result
    ///
    /// An unseen item gets a default schedule tagged with `group_id` before
    /// the update. An existing schedule keeps its original group.
    pub async fn update_schedule_after_review(
        &self,
        item_id: &str,
        group_id: &str,
        quality: i32,
    ) -> Result<ReviewSchedule> {
        if !is_valid_quality(quality) {
            tracing::warn!(item_id, quality, "Rejected review with invalid quality");
            return Err(SrsError::InvalidQuality(quality));
        }

        let _gate = self.write_gate.lock().await;

        let now = self.clock.now();
        let current = match self.store.get(item_id)? {
            Some(schedule) => schedule,
            None => ReviewSchedule::new(item_id, group_id, now),
        };
        let updated = current.updated_after_review(quality, now);
        self.store.put(&updated)?;

        tracing::debug!(
            item_id,
            group_id = %updated.group_id,
            quality,
            interval_secs = updated.interval_seconds,
            ease = updated.ease_factor,
            "Schedule updated"
        );
        Ok(updated)
    }

    /// Ids of every schedule due at or before `as_of`, earliest first
    pub async fn get_due_reviews(&self, as_of: DateTime<Utc>) -> Result<Vec<String>> {
        let schedules = self.store.get_all()?;
        let mut due: Vec<&ReviewSchedule> = schedules
            .values()
            .filter(|s| s.next_review_due_at <= as_of)
            .collect();
        due.sort_by(|a, b| {
            a.next_review_due_at
                .cmp(&b.next_review_due_at)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        Ok(due.into_iter().map(|s| s.item_id.clone()).collect())
    }

    /// Today's queue, optionally restricted to one group
    pub async fn generate_daily_queue(&self, group_id: Option<&str>) -> Result<DailyReviewQueue> {
        let now = self.clock.now();
        let schedules = self.store.get_all()?;
        let queue = DailyReviewQueue::build(
            schedules
                .values()
                .filter(|s| group_id.is_none_or(|g| s.group_id == g)),
            now,
            &self.config.utc_offset,
            &self.config,
        );
        tracing::debug!(
            group_id = group_id.unwrap_or("*"),
            reviews = queue.review_items.len(),
            new_target = queue.new_items_target,
            "Generated daily queue"
        );
        Ok(queue)
    }

    pub async fn get_schedule(&self, item_id: &str) -> Result<Option<ReviewSchedule>> {
        Ok(self.store.get(item_id)?)
    }

    /// Aggregate statistics for one group
    pub async fn get_review_stats(&self, group_id: &str) -> Result<ReviewStats> {
        let now = self.clock.now();
        let schedules = self.store.get_all()?;
        Ok(ReviewStats::from_schedules(
            group_id,
            schedules.values(),
            now,
            &self.config.utc_offset,
        ))
    }

    pub async fn get_all_schedules(&self) -> Result<HashMap<String, ReviewSchedule>> {
        Ok(self.store.get_all()?)
    }

    /// Remove every schedule of `group_id`, returning how many were removed
    pub async fn delete_schedules(&self, group_id: &str) -> Result<usize> {
        let _gate = self.write_gate.lock().await;
        let removed = self.store.delete_by_group(group_id)?;
        tracing::info!(group_id, removed, "Deleted group schedules");
        Ok(removed)
    }

    /// What a correct and an incorrect answer would do to `item_id` right now
    pub async fn preview_review(&self, item_id: &str) -> Result<ReviewPreview> {
        let schedule = self
            .store
            .get(item_id)?
            .ok_or_else(|| SrsError::ScheduleNotFound(item_id.to_string()))?;
        let now = self.clock.now();
        Ok(ReviewPreview {
            correct: schedule.updated_after_review(QUALITY_CORRECT, now),
            incorrect: schedule.updated_after_review(QUALITY_INCORRECT, now),
        })
    }

    /// Reminder for everything due now, `None` when nothing is due
    pub async fn due_reminder(&self) -> Result<Option<ReviewReminder>> {
        let due = self.get_due_reviews(self.clock.now()).await?;
        Ok(ReviewReminder::for_due_count(due.len()))
    }

    /// Whole table as a snapshot stamped with the current instant
    pub async fn export_snapshot(&self) -> Result<ScheduleSnapshot> {
        let schedules = self.store.get_all()?;
        Ok(ScheduleSnapshot::new(self.clock.now(), schedules.into_values()))
    }

    /// Replace the whole table with `snapshot`, returning the number of schedules imported
    ///
    /// The snapshot is validated in full before anything is written.
    pub async fn import_snapshot(&self, snapshot: ScheduleSnapshot) -> Result<usize> {
        snapshot.validate().map_err(SrsError::InvalidSnapshot)?;
        let schedules: Vec<ReviewSchedule> = snapshot.schedules.into_values().collect();

        let _gate = self.write_gate.lock().await;
        self.store.replace_all(&schedules)?;
        tracing::info!(count = schedules.len(), "Imported schedule snapshot");
        Ok(schedules.len())
    }
}

// ============================================================================
// TESTS
// ============================================================================
