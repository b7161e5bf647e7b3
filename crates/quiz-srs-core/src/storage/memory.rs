//! In-memory schedule store.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{Result, ScheduleStore, StorageError};
use crate::schedule::ReviewSchedule;

/// `HashMap`-backed store; contents are lost when dropped
#[derive(Debug, Default)]
pub struct MemoryScheduleStore {
    schedules: Mutex<HashMap<String, ReviewSchedule>>,
}

impl MemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `schedules`
    pub fn with_schedules(schedules: impl IntoIterator<Item = ReviewSchedule>) -> Self {
        let map = schedules
            .into_iter()
            .map(|s| (s.item_id.clone(), s))
            .collect();
        Self {
            schedules: Mutex::new(map),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, ReviewSchedule>>> {
        self.schedules
            .lock()
            .map_err(|_| StorageError::Init("Schedule map lock poisoned".into()))
    }
}

impl ScheduleStore for MemoryScheduleStore {
    fn get(&self, item_id: &str) -> Result<Option<ReviewSchedule>> {
        Ok(self.lock()?.get(item_id).cloned())
    }

    fn get_all(&self) -> Result<HashMap<String, ReviewSchedule>> {
        Ok(self.lock()?.clone())
    }

    fn put(&self, schedule: &ReviewSchedule) -> Result<()> {
        self.lock()?
            .insert(schedule.item_id.clone(), schedule.clone());
        Ok(())
    }

    fn delete_by_group(&self, group_id: &str) -> Result<usize> {
        let mut map = self.lock()?;
        let before = map.len();
        map.retain(|_, s| s.group_id != group_id);
        Ok(before - map.len())
    }

    fn replace_all(&self, schedules: &[ReviewSchedule]) -> Result<()> {
        let fresh: HashMap<String, ReviewSchedule> = schedules
            .iter()
            .map(|s| (s.item_id.clone(), s.clone()))
            .collect();
        *self.lock()? = fresh;
        Ok(())
    }
}
