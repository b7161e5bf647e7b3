//! Test Database Manager
//!
//! Provides isolated scheduler instances for testing:
//! - Temporary SQLite databases that are automatically cleaned up
//! - A fixed clock the test advances by hand
//! - Reopening the same database to simulate an app restart

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use quiz_srs_core::{
    FixedClock, ReviewRecorder, SchedulerConfig, SqliteScheduleStore, SrsScheduler,
};
use tempfile::TempDir;

/// Manager for test databases
///
/// Creates isolated database instances for each test to prevent interference.
/// Automatically cleans up temporary databases when dropped.
///
/// # Example
///
/// ```rust,ignore
/// let db = TestDatabaseManager::new_temp();
///
/// db.scheduler.update_schedule_after_review("q1", "SE-0001", 5).await?;
/// db.clock.advance(Duration::days(1));
///
/// // Database is automatically deleted when `db` goes out of scope
/// ```
pub struct TestDatabaseManager {
    /// Store backing the scheduler
    pub store: Arc<SqliteScheduleStore>,
    /// Scheduler under test
    pub scheduler: Arc<SrsScheduler>,
    /// Clock shared with the scheduler
    pub clock: Arc<FixedClock>,
    /// Temporary directory (kept alive to prevent premature deletion)
    _temp_dir: TempDir,
    /// Path to the database file
    db_path: PathBuf,
}

impl TestDatabaseManager {
    /// Default start instant: 2025-03-10 12:00 UTC
    pub fn default_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0)
            .single()
            .expect("valid start instant")
    }

    /// Calendar-day time zone used by every harness scheduler
    pub fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).expect("valid offset")
    }

    /// Create a new test database at the default start instant
    pub fn new_temp() -> Self {
        Self::new_temp_at(Self::default_start())
    }

    /// Create a new test database with the clock pinned to `now`
    pub fn new_temp_at(now: DateTime<Utc>) -> Self {
        Self::new_temp_with(now, Self::utc())
    }

    /// Create a new test database with an explicit calendar-day time zone
    pub fn new_temp_with(now: DateTime<Utc>, utc_offset: FixedOffset) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test_quiz_srs.db");
        let clock = Arc::new(FixedClock::new(now));

        let store = Arc::new(
            SqliteScheduleStore::new(Some(db_path.clone())).expect("Failed to create test storage"),
        );
        let scheduler = Arc::new(Self::build_scheduler(&store, &clock, utc_offset));

        Self {
            store,
            scheduler,
            clock,
            _temp_dir: temp_dir,
            db_path,
        }
    }

    fn build_scheduler(
        store: &Arc<SqliteScheduleStore>,
        clock: &Arc<FixedClock>,
        utc_offset: FixedOffset,
    ) -> SrsScheduler {
        SrsScheduler::new(
            store.clone(),
            clock.clone(),
            SchedulerConfig::default().with_utc_offset(utc_offset),
        )
    }

    /// Drop the store and open the same file again, keeping the clock
    pub fn reopen(&mut self) {
        let utc_offset = self.scheduler.config().utc_offset;
        let store = Arc::new(
            SqliteScheduleStore::new(Some(self.db_path.clone()))
                .expect("Failed to reopen test storage"),
        );
        self.scheduler = Arc::new(Self::build_scheduler(&store, &self.clock, utc_offset));
        self.store = store;
    }

    /// A second, empty database sharing nothing with this one
    pub fn sibling(&self) -> Self {
        Self::new_temp_with(self.now(), self.scheduler.config().utc_offset)
    }

    /// Consumer facade over this manager's scheduler
    pub fn recorder(&self) -> ReviewRecorder {
        ReviewRecorder::new(self.scheduler.clone())
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.scheduler.now()
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Directory holding the database, for side files like backups
    pub fn dir(&self) -> &Path {
        self._temp_dir.path()
    }
}
