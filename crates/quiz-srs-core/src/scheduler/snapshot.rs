//! Snapshot export/import format.
//!
//! ```json
//! {
//!   "version": 1,
//!   "exportedAt": 1718000000000,
//!   "schedules": { "<itemId>": { "itemId": "...", "groupId": "...", ... } }
//! }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::ReviewSchedule;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Whole schedule table as a serializable value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSnapshot {
    pub version: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub exported_at: DateTime<Utc>,
    /// Keyed by item id; sorted so exports diff cleanly
    pub schedules: BTreeMap<String, ReviewSchedule>,
}

impl ScheduleSnapshot {
    pub fn new(
        exported_at: DateTime<Utc>,
        schedules: impl IntoIterator<Item = ReviewSchedule>,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            exported_at,
            schedules: schedules
                .into_iter()
                .map(|s| (s.item_id.clone(), s))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    /// Check version, key/id agreement and every record's invariants
    pub fn validate(&self) -> Result<(), String> {
        if self.version != SNAPSHOT_VERSION {
            return Err(format!(
                "unsupported snapshot version {} (expected {})",
                self.version, SNAPSHOT_VERSION
            ));
        }
        for (key, schedule) in &self.schedules {
            if key != &schedule.item_id {
                return Err(format!(
                    "key '{}' does not match itemId '{}'",
                    key, schedule.item_id
                ));
            }
            schedule
                .validate()
                .map_err(|reason| format!("schedule '{}': {}", key, reason))?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
