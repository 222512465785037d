//! Journal schema manager.
//!
//! # Responsibility
//! - Idempotently create the `Subject` and `Entry` tables.
//! - Reject database files whose tables predate the required column layout.
//!
//! # Invariants
//! - `ensure_schema` issues DDL only; it never touches journal rows.
//! - A rejected file is rolled back: no table, index or `user_version`
//!   change survives a failed `ensure_schema`.
//! - After success every column listed in `REQUIRED_COLUMNS` exists.

use super::migrations::{apply_migrations, latest_version};
use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Table and column names the repositories read and write.
pub const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("Subject", &["SubjectID", "SubjectName", "CreationDate"]),
    (
        "Entry",
        &["EntryID", "SubjectID", "EntryDate", "Detail", "CreationDate"],
    ),
];

/// Creates missing tables and verifies the resulting layout.
///
/// Safe to call on every startup.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file was written by a newer
///   binary.
/// - `DbError::MissingRequiredTable` / `DbError::MissingRequiredColumn` when a
///   pre-existing table has an incompatible layout.
/// - `DbError::Sqlite` when storage is unreachable or corrupt.
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;
    let from_version = apply_migrations(&tx)?;
    verify_schema(&tx)?;
    tx.commit()?;

    let latest = latest_version();
    if from_version < latest {
        info!(
            "event=db_migrate module=db status=ok from_version={} to_version={}",
            from_version, latest
        );
    }
    Ok(())
}

/// Checks that every required table and column is present.
pub fn verify_schema(conn: &Connection) -> DbResult<()> {
    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(DbError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(DbError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{ensure_schema, verify_schema};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn ensure_schema_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        ensure_schema(&mut conn).unwrap();
        ensure_schema(&mut conn).unwrap();
        verify_schema(&conn).unwrap();
    }

    #[test]
    fn legacy_subject_table_without_creation_date_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Subject (
                SubjectID INTEGER PRIMARY KEY AUTOINCREMENT,
                SubjectName TEXT UNIQUE NOT NULL
            );",
        )
        .unwrap();

        let err = ensure_schema(&mut conn).unwrap_err();
        assert!(matches!(
            err,
            DbError::MissingRequiredColumn {
                table: "Subject",
                column: "CreationDate"
            }
        ));
    }
}
