//! Scheduler configuration.

use chrono::{FixedOffset, Local, Offset};

/// Environment variable overriding the calendar-day time zone, in minutes east of UTC
pub const UTC_OFFSET_ENV: &str = "QUIZ_SRS_UTC_OFFSET_MINUTES";

/// Configuration for the SRS scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Time zone that defines "today" for due-today queries
    pub utc_offset: FixedOffset,
    /// Target new items = review items / divisor
    pub new_item_divisor: usize,
    /// Minimum new-item target whenever review items exist
    pub min_new_items: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            utc_offset: Local::now().offset().fix(),
            new_item_divisor: 4,
            min_new_items: 1,
        }
    }
}

impl SchedulerConfig {
    /// Defaults with the time zone overridden by `QUIZ_SRS_UTC_OFFSET_MINUTES` if set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(UTC_OFFSET_ENV) {
            match parse_offset_minutes(&raw) {
                Some(offset) => config.utc_offset = offset,
                None => tracing::warn!(value = %raw, "Ignoring invalid {}", UTC_OFFSET_ENV),
            }
        }
        config
    }

    /// Same config pinned to a time zone
    pub fn with_utc_offset(mut self, utc_offset: FixedOffset) -> Self {
        self.utc_offset = utc_offset;
        self
    }

    /// New-item target for a queue holding `review_count` due reviews
    pub fn new_items_target(&self, review_count: usize) -> usize {
        if review_count == 0 {
            return 0;
        }
        (review_count / self.new_item_divisor.max(1)).max(self.min_new_items)
    }
}

/// Parse "-300" / "540" (minutes east of UTC) into an offset
pub fn parse_offset_minutes(raw: &str) -> Option<FixedOffset> {
    let minutes: i32 = raw.trim().parse().ok()?;
    FixedOffset::east_opt(minutes.checked_mul(60)?)
}
