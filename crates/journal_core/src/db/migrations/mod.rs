//! SQLite migration registry and executor.
//!
//! # Responsibility
//! - Register schema steps in strictly increasing order.
//! - Apply pending steps inside the caller's transaction.
//!
//! # Invariants
//! - `version` values must remain monotonic.
//! - Applied migration version is mirrored to `PRAGMA user_version`.
//! - Every step is written with `IF NOT EXISTS` so databases created before
//!   version tracking upgrade in place.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        sql: include_str!("0002_entry_indexes.sql"),
    },
];

/// Returns the latest migration version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Runs pending migrations on `conn` and returns the version found before.
///
/// Does not commit; `ensure_schema` owns the enclosing transaction so a file
/// that later fails verification is left untouched.
pub fn apply_migrations(conn: &Connection) -> DbResult<u32> {
    let current_version = current_user_version(conn)?;
    let latest = latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    for migration in MIGRATIONS
        .iter()
        .filter(|migration| migration.version > current_version)
    {
        conn.execute_batch(migration.sql)?;
        conn.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    Ok(current_version)
}

/// Reads the schema version stored in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
