//! # Quiz SRS Core
//!
//! Spaced-repetition scheduling for quiz items:
//!
//! - **SM-2 Schedules**: per-item interval, ease factor and streak, updated by a pure function
//! - **Daily Queues**: overdue reviews first, then reviews due later today, plus a new-item target
//! - **Mastery Statistics**: per-group overdue/due-today counts, mean ease, mastery histogram and score
//! - **Durable Storage**: SQLite schedule table with versioned migrations, or an in-memory map
//! - **Snapshots**: JSON export/import of the whole schedule table
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use quiz_srs_core::{SqliteScheduleStore, SrsScheduler, ReviewRecorder};
//!
//! // Open storage (uses default platform-specific location)
//! let store = Arc::new(SqliteScheduleStore::new(None)?);
//! let scheduler = Arc::new(SrsScheduler::with_system_clock(store));
//!
//! // Report an answer from the quiz flow
//! let recorder = ReviewRecorder::new(scheduler.clone());
//! recorder.record_answer("SE-0296-q3", "SE-0296", true).await;
//!
//! // What to review today
//! let queue = scheduler.generate_daily_queue(Some("SE-0296")).await?;
//! let stats = scheduler.get_review_stats("SE-0296").await?;
//! println!("{} due, mastery {:.1}", queue.review_items.len(), stats.mastery_score());
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): Bundled SQLite
//! - `encryption`: SQLCipher; key read from `QUIZ_SRS_ENCRYPTION_KEY`

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod clock;
pub mod config;
pub mod schedule;
pub mod scheduler;
pub mod session;
pub mod storage;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Schedule model and SM-2
pub use schedule::{
    DEFAULT_EASE_FACTOR, MIN_EASE_FACTOR, MasteryLevel, MasteryLevelCounts, ReviewSchedule,
    ease_delta, is_valid_quality, quality_from_correct,
};

// Storage layer
pub use storage::{MemoryScheduleStore, ScheduleStore, SqliteScheduleStore, StorageError};

// Scheduler service
pub use scheduler::{
    DailyReviewQueue, ReviewPreview, ReviewReminder, ReviewStats, ScheduleSnapshot, SrsError,
    SrsScheduler,
};

// Consumer contract
pub use session::{GroupProgress, ProgressStatus, ReviewRecorder};

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::SchedulerConfig;

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scheduling algorithm
pub const ALGORITHM: &str = "SM-2";

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        Clock, DailyReviewQueue, MasteryLevel, ReviewRecorder, ReviewSchedule, ReviewStats,
        ScheduleStore, SchedulerConfig, SqliteScheduleStore, SrsError, SrsScheduler,
        StorageError, SystemClock,
    };
}
