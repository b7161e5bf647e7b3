//! Database Migrations
//!
//! Schema migration definitions for the schedule table.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial review schedule table",
        up: MIGRATION_V1_UP,
    },
    Migration {
        version: 2,
        description: "Group and due-date indexes for aggregate queries",
        up: MIGRATION_V2_UP,
    },
];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Initial schema
///
/// Timestamps are epoch milliseconds.
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS review_schedules (
    item_id TEXT PRIMARY KEY,
    group_id TEXT NOT NULL,
    next_review_due_at INTEGER NOT NULL,
    interval_seconds REAL NOT NULL DEFAULT 86400.0,
    ease_factor REAL NOT NULL DEFAULT 2.5,
    consecutive_correct INTEGER NOT NULL DEFAULT 0,
    review_count INTEGER NOT NULL DEFAULT 0,
    last_reviewed_at INTEGER,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
"#;

/// V2: Indexes for group filters and due-date scans
const MIGRATION_V2_UP: &str = r#"
CREATE INDEX IF NOT EXISTS idx_review_schedules_group ON review_schedules(group_id);
CREATE INDEX IF NOT EXISTS idx_review_schedules_due ON review_schedules(next_review_due_at);

UPDATE schema_version SET version = 2, applied_at = datetime('now');
"#;

/// Get current schema version
pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                "Applying migration v{}: {}",
                migration.version,
                migration.description
            );

            conn.execute_batch(migration.up)?;
            applied += 1;
        }
    }

    Ok(applied)
}
