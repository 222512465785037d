//! Error type for the `journal` binary.

use journal_core::{DbError, ExportError, LoggingError, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum CliError {
    Open(DbError),
    Repo(RepoError),
    Export(ExportError),
    Config(String),
    Logging(LoggingError),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl CliError {
    /// 1: storage failure, 2: rejected user input, 3: config or I/O.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Open(_) => 1,
            Self::Repo(err) | Self::Export(ExportError::Repo(err)) => repo_exit_code(err),
            Self::Export(ExportError::NothingToExport(_)) => 2,
            Self::Export(ExportError::Io(_))
            | Self::Config(_)
            | Self::Logging(_)
            | Self::Json(_)
            | Self::Io(_) => 3,
        }
    }
}

fn repo_exit_code(err: &RepoError) -> i32 {
    match err {
        RepoError::Storage(_) | RepoError::InvalidData(_) => 1,
        RepoError::DuplicateSubject(_)
        | RepoError::SubjectNotFound(_)
        | RepoError::EntryNotFound(_)
        | RepoError::Validation(_) => 2,
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open(err) => write!(f, "failed to open journal: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
            Self::Config(message) => write!(f, "configuration error: {message}"),
            Self::Logging(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "failed to serialize output: {err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Export(err) => Some(err),
            Self::Logging(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Config(_) => None,
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Open(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<ExportError> for CliError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

impl From<LoggingError> for CliError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::CliError;
    use journal_core::{DbError, ExportError, RepoError, SubjectRef};

    #[test]
    fn user_errors_exit_with_two() {
        let err = CliError::Repo(RepoError::SubjectNotFound(SubjectRef::ById(1)));
        assert_eq!(err.exit_code(), 2);
        let err = CliError::Export(ExportError::NothingToExport("Work".to_string()));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn storage_errors_exit_with_one() {
        let err = CliError::Repo(RepoError::Storage(DbError::ConnectionClosed));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(CliError::Open(DbError::ConnectionClosed).exit_code(), 1);
    }

    #[test]
    fn config_errors_exit_with_three() {
        assert_eq!(CliError::Config("bad".to_string()).exit_code(), 3);
    }
}
