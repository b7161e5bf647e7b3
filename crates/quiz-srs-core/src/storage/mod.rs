//! Storage Module
//!
//! Durable mapping from item id to `ReviewSchedule`:
//! - `ScheduleStore` trait - the contract the scheduler depends on
//! - SQLite implementation with versioned migrations
//! - In-memory implementation for tests and ephemeral sessions

mod memory;
mod migrations;
mod sqlite;

use std::collections::HashMap;

use crate::schedule::ReviewSchedule;

pub use memory::MemoryScheduleStore;
pub use migrations::{MIGRATIONS, Migration, apply_migrations, get_current_version};
pub use sqlite::SqliteScheduleStore;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Stored data could not be decoded
    #[error("Corrupt schedule data for '{item_id}': {reason}")]
    Corrupt { item_id: String, reason: String },
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

// ============================================================================
// STORE CONTRACT
// ============================================================================

/// Durable `item_id -> ReviewSchedule` mapping.
///
/// Every method is a single atomic unit: a reader never observes a half-applied
/// `put`, `delete_by_group` or `replace_all`.
pub trait ScheduleStore: Send + Sync {
    /// Schedule for one item, `None` if never reviewed
    fn get(&self, item_id: &str) -> Result<Option<ReviewSchedule>>;

    /// Every stored schedule keyed by item id
    fn get_all(&self) -> Result<HashMap<String, ReviewSchedule>>;

    /// Insert or replace the schedule for `schedule.item_id`
    fn put(&self, schedule: &ReviewSchedule) -> Result<()>;

    /// Remove every schedule tagged with `group_id`, returning how many were removed
    fn delete_by_group(&self, group_id: &str) -> Result<usize>;

    /// Replace the whole table with `schedules`
    fn replace_all(&self, schedules: &[ReviewSchedule]) -> Result<()>;
}
