//! Daily review reminder content.
//!
//! Only the content is produced here; delivering it (OS notification, mail,
//! terminal banner) is left to the consumer.

use chrono::{DateTime, Days, FixedOffset, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Hour of day the reminder fires by default
pub const DEFAULT_REMINDER_HOUR: u32 = 9;

/// Reminder for reviews that are due
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewReminder {
    /// Number of items due across all groups
    pub due_count: usize,
    pub title: String,
    pub body: String,
}

impl ReviewReminder {
    /// Reminder for `due_count` due items, `None` when nothing is due
    pub fn for_due_count(due_count: usize) -> Option<Self> {
        if due_count == 0 {
            return None;
        }
        let noun = if due_count == 1 { "question is" } else { "questions are" };
        Some(Self {
            due_count,
            title: "Time to review".to_string(),
            body: format!(
                "{} {} due for review. Keep your learning going today!",
                due_count, noun
            ),
        })
    }

    /// Badge number shown next to the reminder
    pub fn badge(&self) -> usize {
        self.due_count
    }
}

/// Next instant at which a daily reminder at `hour:00` local time fires
pub fn next_reminder_at(now: DateTime<Utc>, tz: &FixedOffset, hour: u32) -> Option<DateTime<Utc>> {
    let local_now = now.with_timezone(tz);
    let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
    let today = local_now.date_naive().and_time(time);
    let fire = if today > local_now.naive_local() {
        today
    } else {
        local_now.date_naive().checked_add_days(Days::new(1))?.and_time(time)
    };
    fire.and_local_timezone(*tz)
        .single()
        .map(|t| t.with_timezone(&Utc))
}
