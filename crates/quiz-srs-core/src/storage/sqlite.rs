//! SQLite Storage Implementation
//!
//! One row per schedule in `review_schedules`, timestamps as epoch milliseconds.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params};

use super::{Result, ScheduleStore, StorageError};
use crate::schedule::ReviewSchedule;

const SELECT_COLUMNS: &str = "SELECT item_id, group_id, next_review_due_at, interval_seconds, \
     ease_factor, consecutive_correct, review_count, last_reviewed_at, created_at, updated_at \
     FROM review_schedules";

const UPSERT_SQL: &str = "INSERT OR REPLACE INTO review_schedules (
        item_id, group_id, next_review_due_at, interval_seconds, ease_factor,
        consecutive_correct, review_count, last_reviewed_at, created_at, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

// ============================================================================
// STORAGE
// ============================================================================

/// SQLite-backed schedule store
///
/// Uses separate reader/writer connections so aggregate scans do not queue
/// behind writes. All methods take `&self`; the store is `Send + Sync`.
pub struct SqliteScheduleStore {
    writer: Mutex<Connection>,
    reader: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteScheduleStore {
    /// Apply PRAGMAs and optional encryption to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        // Apply encryption key if SQLCipher is enabled and key is provided
        #[cfg(feature = "encryption")]
        {
            if let Ok(key) = std::env::var("QUIZ_SRS_ENCRYPTION_KEY") {
                if !key.is_empty() {
                    conn.pragma_update(None, "key", &key)?;
                }
            }
        }

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA busy_timeout = 5000;",
        )?;

        Ok(())
    }

    /// Default database location under the platform data directory
    pub fn default_db_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "quiz-srs", "core").ok_or_else(|| {
            StorageError::Init("Could not determine project directories".to_string())
        })?;
        Ok(proj_dirs.data_dir().join("schedules.db"))
    }

    /// Open (or create) the store at `db_path`, or at the default location
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let writer_conn = Connection::open(&path)?;

        // Restrict database file permissions to owner-only on Unix
        #[cfg(unix)]
        if path.exists() {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&path, perms);
        }

        Self::configure_connection(&writer_conn)?;

        // Apply migrations on writer only
        let applied = super::migrations::apply_migrations(&writer_conn)?;
        if applied > 0 {
            tracing::info!(applied, path = %path.display(), "Schedule database migrated");
        }

        let reader_conn = Connection::open(&path)?;
        Self::configure_connection(&reader_conn)?;

        Ok(Self {
            writer: Mutex::new(writer_conn),
            reader: Mutex::new(reader_conn),
            path,
        })
    }

    /// Path of the underlying database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored schedules
    pub fn count(&self) -> Result<usize> {
        let reader = self.lock_reader()?;
        let count: i64 =
            reader.query_row("SELECT COUNT(*) FROM review_schedules", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Create a consistent backup using VACUUM INTO
    pub fn backup_to(&self, path: &Path) -> Result<()> {
        let path_str = path
            .to_str()
            .ok_or_else(|| StorageError::Init("Invalid backup path encoding".to_string()))?;
        if path_str.bytes().any(|b| b < 0x20 && b != b'\t') {
            return Err(StorageError::Init(
                "Backup path contains invalid characters".to_string(),
            ));
        }
        let reader = self.lock_reader()?;
        // VACUUM INTO doesn't support parameterized queries; escape single quotes
        reader.execute_batch(&format!("VACUUM INTO '{}'", path_str.replace('\'', "''")))?;
        Ok(())
    }

    fn lock_reader(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.reader
            .lock()
            .map_err(|_| StorageError::Init("Reader lock poisoned".into()))
    }

    fn lock_writer(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.writer
            .lock()
            .map_err(|_| StorageError::Init("Writer lock poisoned".into()))
    }

    /// Read a row as raw values; decoding happens in `decode_row` so type
    /// mismatches surface as `Corrupt` rather than driver errors.
    fn row_to_values(row: &rusqlite::Row) -> rusqlite::Result<Vec<Value>> {
        (0..10).map(|i| row.get::<_, Value>(i)).collect()
    }

    fn decode_row(values: Vec<Value>) -> Result<ReviewSchedule> {
        let mut cols = values.into_iter();
        let mut next = || cols.next().unwrap_or(Value::Null);

        let item_id = match next() {
            Value::Text(s) => s,
            other => {
                return Err(StorageError::Corrupt {
                    item_id: String::new(),
                    reason: format!("item_id has unexpected value {:?}", other),
                });
            }
        };
        let corrupt = |reason: String| StorageError::Corrupt {
            item_id: item_id.clone(),
            reason,
        };

        let group_id = match next() {
            Value::Text(s) => s,
            other => return Err(corrupt(format!("group_id has unexpected value {:?}", other))),
        };
        let next_review_due_at = decode_timestamp(next(), "next_review_due_at").map_err(&corrupt)?;
        let interval_seconds = decode_real(next(), "interval_seconds").map_err(&corrupt)?;
        let ease_factor = decode_real(next(), "ease_factor").map_err(&corrupt)?;
        let consecutive_correct = decode_count(next(), "consecutive_correct").map_err(&corrupt)?;
        let review_count = decode_count(next(), "review_count").map_err(&corrupt)?;
        let last_reviewed_at = match next() {
            Value::Null => None,
            v => Some(decode_timestamp(v, "last_reviewed_at").map_err(&corrupt)?),
        };
        let created_at = decode_timestamp(next(), "created_at").map_err(&corrupt)?;
        let updated_at = decode_timestamp(next(), "updated_at").map_err(&corrupt)?;

        let schedule = ReviewSchedule {
            item_id: item_id.clone(),
            group_id,
            next_review_due_at,
            interval_seconds,
            ease_factor,
            consecutive_correct,
            review_count,
            last_reviewed_at,
            created_at,
            updated_at,
        };
        schedule.validate().map_err(&corrupt)?;
        Ok(schedule)
    }

    fn insert(conn: &Connection, schedule: &ReviewSchedule) -> rusqlite::Result<usize> {
        conn.execute(
            UPSERT_SQL,
            params![
                schedule.item_id,
                schedule.group_id,
                schedule.next_review_due_at.timestamp_millis(),
                schedule.interval_seconds,
                schedule.ease_factor,
                schedule.consecutive_correct,
                schedule.review_count,
                schedule.last_reviewed_at.map(|t| t.timestamp_millis()),
                schedule.created_at.timestamp_millis(),
                schedule.updated_at.timestamp_millis(),
            ],
        )
    }
}

fn decode_timestamp(value: Value, column: &str) -> std::result::Result<DateTime<Utc>, String> {
    match value {
        Value::Integer(ms) => DateTime::<Utc>::from_timestamp_millis(ms)
            .ok_or_else(|| format!("{} out of range: {}", column, ms)),
        other => Err(format!("{} has unexpected value {:?}", column, other)),
    }
}

fn decode_real(value: Value, column: &str) -> std::result::Result<f64, String> {
    match value {
        Value::Real(v) => Ok(v),
        Value::Integer(v) => Ok(v as f64),
        other => Err(format!("{} has unexpected value {:?}", column, other)),
    }
}

fn decode_count(value: Value, column: &str) -> std::result::Result<u32, String> {
    match value {
        Value::Integer(v) => u32::try_from(v).map_err(|_| format!("{} out of range: {}", column, v)),
        other => Err(format!("{} has unexpected value {:?}", column, other)),
    }
}

impl ScheduleStore for SqliteScheduleStore {
    fn get(&self, item_id: &str) -> Result<Option<ReviewSchedule>> {
        let values = {
            let reader = self.lock_reader()?;
            reader
                .query_row(
                    &format!("{} WHERE item_id = ?1", SELECT_COLUMNS),
                    params![item_id],
                    Self::row_to_values,
                )
                .optional()?
        };
        values.map(Self::decode_row).transpose()
    }

    fn get_all(&self) -> Result<HashMap<String, ReviewSchedule>> {
        let rows: Vec<Vec<Value>> = {
            let reader = self.lock_reader()?;
            let mut stmt = reader.prepare(SELECT_COLUMNS)?;
            let rows = stmt.query_map([], Self::row_to_values)?;
            rows.collect::<rusqlite::Result<_>>()?
        };

        let mut schedules = HashMap::with_capacity(rows.len());
        for values in rows {
            let schedule = Self::decode_row(values)?;
            schedules.insert(schedule.item_id.clone(), schedule);
        }
        tracing::debug!(count = schedules.len(), "Loaded schedule table");
        Ok(schedules)
    }

    fn put(&self, schedule: &ReviewSchedule) -> Result<()> {
        let writer = self.lock_writer()?;
        Self::insert(&writer, schedule)?;
        Ok(())
    }

    fn delete_by_group(&self, group_id: &str) -> Result<usize> {
        let writer = self.lock_writer()?;
        let removed = writer.execute(
            "DELETE FROM review_schedules WHERE group_id = ?1",
            params![group_id],
        )?;
        Ok(removed)
    }

    fn replace_all(&self, schedules: &[ReviewSchedule]) -> Result<()> {
        let mut writer = self.lock_writer()?;
        let tx = writer.transaction()?;
        tx.execute("DELETE FROM review_schedules", [])?;
        for schedule in schedules {
            Self::insert(&tx, schedule)?;
        }
        tx.commit()?;
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
