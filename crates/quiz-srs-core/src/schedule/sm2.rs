//! SM-2 update.
//!
//! `updated_after_review` is total: an out-of-range quality returns the
//! schedule unchanged. Range enforcement happens at the scheduler boundary.

use chrono::{DateTime, Utc};

use super::{
    FIRST_INTERVAL_SECS, MAX_INTERVAL_SECS, MAX_QUALITY, MIN_EASE_FACTOR, PASSING_QUALITY,
    ReviewSchedule, SECOND_INTERVAL_SECS, due_after, is_valid_quality, truncate_to_millis,
};

/// Ease factor change for a quality signal.
///
/// +0.1 at q=5, 0.0 at q=4, negative below.
pub fn ease_delta(quality: i32) -> f64 {
    let miss = f64::from(MAX_QUALITY - quality);
    0.1 - miss * (0.08 + miss * 0.02)
}

impl ReviewSchedule {
    /// Apply one SM-2 review at `now`.
    ///
    /// - quality >= 3: interval steps 1 day -> 3 days -> interval * ease, streak + 1
    /// - quality < 3: streak reset to 0, interval back to 1 day
    /// - interval capped at `MAX_INTERVAL_SECS`
    /// - ease adjusted on every valid review, floored at 1.3
    pub fn updated_after_review(&self, quality: i32, now: DateTime<Utc>) -> ReviewSchedule {
        if !is_valid_quality(quality) {
            return self.clone();
        }

        let now = truncate_to_millis(now);
        let mut updated = self.clone();
        updated.review_count += 1;
        updated.last_reviewed_at = Some(now);
        updated.updated_at = now;

        if quality >= PASSING_QUALITY {
            updated.interval_seconds = match updated.consecutive_correct {
                0 => FIRST_INTERVAL_SECS,
                1 => SECOND_INTERVAL_SECS,
                _ => (updated.interval_seconds * updated.ease_factor).min(MAX_INTERVAL_SECS),
            };
            updated.consecutive_correct += 1;
        } else {
            updated.consecutive_correct = 0;
            updated.interval_seconds = FIRST_INTERVAL_SECS;
        }

        updated.ease_factor = (updated.ease_factor + ease_delta(quality)).max(MIN_EASE_FACTOR);
        updated.next_review_due_at = due_after(now, updated.interval_seconds);

        updated
    }
}
