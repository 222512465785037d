//! Core persistence and use-case logic for the subject/entry journal.
//! This crate is the single source of truth for journal invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;

pub use db::{DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::entry::{Entry, EntryId, EntryOrder};
pub use model::subject::{Subject, SubjectId, SubjectRef, SubjectSummary};
pub use model::ValidationError;
pub use repo::entry_repo::{EntryRepository, SqliteEntryRepository, SubjectEntries};
pub use repo::subject_repo::{SqliteSubjectRepository, SubjectRepository};
pub use repo::{RepoError, RepoResult};
pub use service::export::ExportError;
pub use service::journal_service::{EntriesListResult, JournalService, JournalStats};
pub use session::{JournalSession, StorageLocation, DEFAULT_DB_FILE_NAME};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
