//! Session handle owning the single journal connection.
//!
//! # Responsibility
//! - Open a storage location and ensure its schema exactly once.
//! - Expose the journal operations over the owned connection.
//! - Release the connection on explicit close or when dropped.
//!
//! # Invariants
//! - At most one connection per session; it is never shared.
//! - After `close`, every operation fails with
//!   `RepoError::Storage(DbError::ConnectionClosed)`.
//! - `Drop` closes a still-open connection, so early returns and unwinding
//!   release it too.

use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use crate::model::entry::{EntryId, EntryOrder};
use crate::model::subject::{Subject, SubjectId, SubjectRef, SubjectSummary};
use crate::repo::entry_repo::SqliteEntryRepository;
use crate::repo::subject_repo::SqliteSubjectRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::export::ExportError;
use crate::service::journal_service::{EntriesListResult, JournalService, JournalStats};
use chrono::NaiveDateTime;
use log::{error, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Default storage file name used when no path is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "journal.db";

/// Where the session's data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    File(PathBuf),
    Memory,
}

type SqliteJournalService<'conn> =
    JournalService<SqliteSubjectRepository<'conn>, SqliteEntryRepository<'conn>>;

/// Owner of the storage connection for the lifetime of one run.
pub struct JournalSession {
    conn: Option<Connection>,
    location: StorageLocation,
}

impl JournalSession {
    /// Opens (creating if needed) the journal file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref();
        let conn = open_db(path)?;
        info!("event=session_open module=session status=ok mode=file");
        Ok(Self {
            conn: Some(conn),
            location: StorageLocation::File(path.to_path_buf()),
        })
    }

    /// Opens a throwaway in-memory journal.
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = open_db_in_memory()?;
        info!("event=session_open module=session status=ok mode=memory");
        Ok(Self {
            conn: Some(conn),
            location: StorageLocation::Memory,
        })
    }

    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Releases the connection. Closing an already closed session is a no-op.
    ///
    /// When SQLite refuses to close, the connection stays owned by the
    /// session and the error is returned.
    pub fn close(&mut self) -> DbResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        match conn.close() {
            Ok(()) => {
                info!("event=session_close module=session status=ok");
                Ok(())
            }
            Err((conn, err)) => {
                error!(
                    "event=session_close module=session status=error error_code=db_close_failed error={}",
                    err
                );
                self.conn = Some(conn);
                Err(err.into())
            }
        }
    }

    pub fn insert_subject(&self, name: &str) -> RepoResult<SubjectId> {
        self.service()?.add_subject(name)
    }

    /// Returns the named subject's id, creating it when absent.
    ///
    /// This is the auto-vivification path used by `insert_entry`; a typo
    /// creates a new subject rather than failing.
    pub fn find_or_create_subject(&self, name: &str) -> RepoResult<SubjectId> {
        self.service()?.find_or_create_subject(name)
    }

    /// Adds an entry dated now; a `ByName` subject is created when absent.
    pub fn insert_entry(&self, subject: &SubjectRef, detail: &str) -> RepoResult<EntryId> {
        self.service()?.add_entry(subject, detail)
    }

    pub fn insert_entry_at(
        &self,
        subject: &SubjectRef,
        detail: &str,
        entry_date: NaiveDateTime,
    ) -> RepoResult<EntryId> {
        self.service()?.add_entry_at(subject, detail, entry_date)
    }

    /// All subjects by id ascending.
    pub fn get_all_subjects(&self) -> RepoResult<Vec<Subject>> {
        self.service()?.list_subjects()
    }

    pub fn list_subject_summaries(&self) -> RepoResult<Vec<SubjectSummary>> {
        self.service()?.list_subject_summaries()
    }

    pub fn get_entries_for_subject(
        &self,
        subject: &SubjectRef,
        order: EntryOrder,
    ) -> RepoResult<EntriesListResult> {
        self.service()?.entries_for_subject(subject, order)
    }

    pub fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        self.service()?.delete_entry(id)
    }

    pub fn stats(&self) -> RepoResult<JournalStats> {
        let service = self.service()?;
        let database_size_bytes = match &self.location {
            StorageLocation::File(path) => std::fs::metadata(path)
                .map_err(|err| RepoError::Storage(DbError::Io(err)))?
                .len(),
            StorageLocation::Memory => 0,
        };
        service.stats(database_size_bytes)
    }

    pub fn export_entries(
        &self,
        subject: &SubjectRef,
        out_dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        self.service()?.export_entries(subject, out_dir)
    }

    fn connection(&self) -> RepoResult<&Connection> {
        self.conn
            .as_ref()
            .ok_or(RepoError::Storage(DbError::ConnectionClosed))
    }

    /// The schema was verified by `open`, so repositories skip the check.
    fn service(&self) -> RepoResult<SqliteJournalService<'_>> {
        let subjects = SqliteSubjectRepository::from_verified(self.connection()?);
        Ok(JournalService::new(
            subjects,
            SqliteEntryRepository::with_subjects(subjects),
        ))
    }
}

impl Drop for JournalSession {
    fn drop(&mut self) {
        // Errors are already logged by `close`.
        let _ = self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::{JournalSession, StorageLocation};
    use crate::db::DbError;
    use crate::repo::RepoError;

    #[test]
    fn closed_session_reports_connection_closed() {
        let mut session = JournalSession::open_in_memory().unwrap();
        session.close().unwrap();
        session.close().unwrap();

        assert!(!session.is_open());
        let err = session.get_all_subjects().unwrap_err();
        assert!(matches!(err, RepoError::Storage(DbError::ConnectionClosed)));
        assert_eq!(err.to_string(), "storage error: connection closed");
    }

    #[test]
    fn in_memory_stats_report_zero_size() {
        let session = JournalSession::open_in_memory().unwrap();
        assert_eq!(session.location(), &StorageLocation::Memory);
        assert_eq!(session.stats().unwrap().database_size_bytes, 0);
    }
}
