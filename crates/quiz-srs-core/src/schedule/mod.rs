//! Review Schedule Module
//!
//! Per-item SM-2 review state:
//! - `ReviewSchedule` - the persisted record for one quiz item
//! - SM-2 update as a pure function of (schedule, quality, instant)
//! - Mastery tiers derived from the consecutive-correct streak
//!
//! ## Core Formulas:
//! - Ease: EF' = max(1.3, EF + 0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
//! - Interval ladder: 1 day, 3 days, then interval * EF

mod mastery;
mod sm2;

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

pub use mastery::{MasteryLevel, MasteryLevelCounts};
pub use sm2::ease_delta;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Ease factor given to a freshly created schedule
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Ease factor floor
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// First step of the interval ladder (1 day)
pub const FIRST_INTERVAL_SECS: f64 = 86_400.0;

/// Second step of the interval ladder (3 days)
pub const SECOND_INTERVAL_SECS: f64 = 259_200.0;

/// Interval ceiling (100 years); long correct streaks saturate here
pub const MAX_INTERVAL_SECS: f64 = 36_500.0 * 86_400.0;

/// Lowest valid quality signal
pub const MIN_QUALITY: i32 = 0;

/// Highest valid quality signal
pub const MAX_QUALITY: i32 = 5;

/// Qualities at or above this count as a successful recall
pub const PASSING_QUALITY: i32 = 3;

/// Quality reported for a correct answer
pub const QUALITY_CORRECT: i32 = 5;

/// Quality reported for an incorrect answer
pub const QUALITY_INCORRECT: i32 = 0;

/// Whether `quality` lies in the SM-2 range [0, 5]
pub fn is_valid_quality(quality: i32) -> bool {
    (MIN_QUALITY..=MAX_QUALITY).contains(&quality)
}

/// Binary answer mapping used by the quiz flow: correct = 5, incorrect = 0
pub fn quality_from_correct(correct: bool) -> i32 {
    if correct {
        QUALITY_CORRECT
    } else {
        QUALITY_INCORRECT
    }
}

/// Convert an interval in seconds to a duration rounded to whole milliseconds
///
/// Input is clamped to `[0, MAX_INTERVAL_SECS]`; NaN maps to zero.
pub fn seconds_to_duration(seconds: f64) -> Duration {
    let millis = (seconds.clamp(0.0, MAX_INTERVAL_SECS) * 1000.0).round() as i64;
    Duration::try_milliseconds(millis).unwrap_or_else(Duration::zero)
}

/// `from + interval`, saturating at the latest representable instant
pub fn due_after(from: DateTime<Utc>, interval_seconds: f64) -> DateTime<Utc> {
    from.checked_add_signed(seconds_to_duration(interval_seconds))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Drop sub-millisecond precision so timestamps survive epoch-millis storage
pub fn truncate_to_millis(instant: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(instant.timestamp_millis()).unwrap_or(instant)
}

// ============================================================================
// REVIEW SCHEDULE
// ============================================================================

/// Review schedule for a single quiz item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSchedule {
    /// Stable identifier of the quiz question
    pub item_id: String,
    /// Grouping tag (e.g. proposal id) used to scope aggregate queries
    pub group_id: String,
    /// When the item next becomes eligible for review
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub next_review_due_at: DateTime<Utc>,
    /// Current spacing interval in seconds
    pub interval_seconds: f64,
    /// Interval growth multiplier (floor 1.3)
    pub ease_factor: f64,
    /// Successful reviews since the last lapse
    pub consecutive_correct: u32,
    /// Lifetime review count
    pub review_count: u32,
    /// Last review instant, `None` until the first review
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_reviewed_at: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl ReviewSchedule {
    /// Create a default schedule: 1-day interval, default ease, due one day from `now`
    pub fn new(item_id: impl Into<String>, group_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        let now = truncate_to_millis(now);
        Self {
            item_id: item_id.into(),
            group_id: group_id.into(),
            next_review_due_at: due_after(now, FIRST_INTERVAL_SECS),
            interval_seconds: FIRST_INTERVAL_SECS,
            ease_factor: DEFAULT_EASE_FACTOR,
            consecutive_correct: 0,
            review_count: 0,
            last_reviewed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Current interval as a millisecond-rounded duration
    pub fn interval(&self) -> Duration {
        seconds_to_duration(self.interval_seconds)
    }

    /// Due strictly before `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.next_review_due_at < now
    }

    /// Due on the same calendar day as `now` in the given time zone
    pub fn is_due_today(&self, now: DateTime<Utc>, tz: &FixedOffset) -> bool {
        self.next_review_due_at.with_timezone(tz).date_naive() == now.with_timezone(tz).date_naive()
    }

    /// Mastery tier derived from the consecutive-correct streak
    pub fn mastery_level(&self) -> MasteryLevel {
        MasteryLevel::from_streak(self.consecutive_correct)
    }

    /// Check the record invariants, returning the first violation
    pub fn validate(&self) -> Result<(), String> {
        if self.item_id.is_empty() {
            return Err("empty item id".to_string());
        }
        if !self.ease_factor.is_finite() || self.ease_factor < MIN_EASE_FACTOR {
            return Err(format!("ease factor {} below {}", self.ease_factor, MIN_EASE_FACTOR));
        }
        if !self.interval_seconds.is_finite() || self.interval_seconds <= 0.0 {
            return Err(format!("interval {} is not positive", self.interval_seconds));
        }
        if self.interval_seconds > MAX_INTERVAL_SECS {
            return Err(format!(
                "interval {} exceeds {}",
                self.interval_seconds, MAX_INTERVAL_SECS
            ));
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
