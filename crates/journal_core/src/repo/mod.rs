//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the insert/query/delete contracts over `Subject` and `Entry`.
//! - Isolate SQLite query details from service orchestration.
//! - Translate low-level storage failures into semantic error kinds.
//!
//! # Invariants
//! - Write paths validate required fields before any SQL mutation.
//! - Every public write is one atomic statement or one transaction.
//! - Storage failures are never swallowed; they surface as `RepoError::Storage`.

pub mod entry_repo;
pub mod subject_repo;

use crate::db::DbError;
use crate::model::entry::EntryId;
use crate::model::subject::SubjectRef;
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error kinds surfaced by journal repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Connection or I/O failure, including lock contention.
    Storage(DbError),
    /// Unique-name violation on subject insert.
    DuplicateSubject(String),
    /// A supplied subject reference did not resolve.
    SubjectNotFound(SubjectRef),
    /// Delete target is absent.
    EntryNotFound(EntryId),
    /// Required field was empty.
    Validation(ValidationError),
    /// Persisted row could not be mapped back to the model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "storage error: {err}"),
            Self::DuplicateSubject(name) => write!(f, "subject '{name}' already exists"),
            Self::SubjectNotFound(subject) => write!(f, "subject {subject} not found"),
            Self::EntryNotFound(id) => write!(f, "entry with ID {id} not found"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted journal data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::DuplicateSubject(_)
            | Self::SubjectNotFound(_)
            | Self::EntryNotFound(_)
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(DbError::Sqlite(value))
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _)
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn parse_stored_timestamp(
    value: &str,
    column: &str,
) -> RepoResult<chrono::NaiveDateTime> {
    crate::model::timestamp::parse_timestamp(value).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}"))
    })
}
