//! Subject repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert and look up subjects in the `Subject` table.
//! - Provide explicit find-or-create for entry auto-vivification.
//!
//! # Invariants
//! - Name matching is exact and case-sensitive (SQLite `BINARY` collation).
//! - Listings are ordered by `SubjectID ASC`.
//! - `find_or_create_subject` is a deliberate convenience: a mistyped name
//!   creates a new subject instead of failing.

use super::{is_unique_violation, parse_stored_timestamp, RepoError, RepoResult};
use crate::db::schema::verify_schema;
use crate::model::subject::{
    validate_subject_name, Subject, SubjectId, SubjectRef, SubjectSummary,
};
use crate::model::timestamp::{format_timestamp, now_local};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};

const SUBJECT_SELECT_SQL: &str = "SELECT
    SubjectID,
    SubjectName,
    CreationDate
FROM Subject";

/// Repository interface for subject operations.
pub trait SubjectRepository {
    /// Inserts a new subject and returns its id.
    ///
    /// Fails with `RepoError::DuplicateSubject` when the name is taken.
    fn insert_subject(&self, name: &str) -> RepoResult<SubjectId>;
    /// Returns the id of the subject named `name`, inserting it when absent.
    fn find_or_create_subject(&self, name: &str) -> RepoResult<SubjectId>;
    fn find_subject(&self, subject: &SubjectRef) -> RepoResult<Option<Subject>>;
    /// Lists all subjects by id ascending.
    fn list_subjects(&self) -> RepoResult<Vec<Subject>>;
    /// Lists all subjects by id ascending, each with its entry count.
    fn list_subject_summaries(&self) -> RepoResult<Vec<SubjectSummary>>;
    fn count_subjects(&self) -> RepoResult<u64>;

    /// Like `find_subject`, but absence is `RepoError::SubjectNotFound`.
    fn resolve_subject(&self, subject: &SubjectRef) -> RepoResult<Subject> {
        self.find_subject(subject)?
            .ok_or_else(|| RepoError::SubjectNotFound(subject.clone()))
    }
}

/// SQLite-backed subject repository.
#[derive(Clone, Copy)]
pub struct SqliteSubjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSubjectRepository<'conn> {
    /// Constructs a repository from a connection with the schema applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        verify_schema(conn)?;
        Ok(Self { conn })
    }

    /// Skips the schema check for connections that passed `ensure_schema`
    /// when they were opened.
    pub(crate) fn from_verified(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    pub(crate) fn connection(&self) -> &'conn Connection {
        self.conn
    }
}

impl SubjectRepository for SqliteSubjectRepository<'_> {
    fn insert_subject(&self, name: &str) -> RepoResult<SubjectId> {
        validate_subject_name(name)?;

        let created_at = format_timestamp(&now_local());
        let result = self.conn.execute(
            "INSERT INTO Subject (SubjectName, CreationDate) VALUES (?1, ?2);",
            params![name, created_at],
        );

        match result {
            Ok(_) => {
                let id = self.conn.last_insert_rowid();
                info!("event=subject_insert module=repo status=ok subject_id={id}");
                Ok(id)
            }
            Err(err) if is_unique_violation(&err) => {
                info!("event=subject_insert module=repo status=rejected error_code=duplicate_subject");
                Err(RepoError::DuplicateSubject(name.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn find_or_create_subject(&self, name: &str) -> RepoResult<SubjectId> {
        validate_subject_name(name)?;

        let created_at = format_timestamp(&now_local());
        let inserted = self.conn.execute(
            "INSERT INTO Subject (SubjectName, CreationDate) VALUES (?1, ?2)
             ON CONFLICT(SubjectName) DO NOTHING;",
            params![name, created_at],
        )?;

        let id: SubjectId = self.conn.query_row(
            "SELECT SubjectID FROM Subject WHERE SubjectName = ?1;",
            [name],
            |row| row.get(0),
        )?;

        if inserted > 0 {
            info!("event=subject_autocreate module=repo status=ok subject_id={id}");
        }
        Ok(id)
    }

    fn find_subject(&self, subject: &SubjectRef) -> RepoResult<Option<Subject>> {
        let row = match subject {
            SubjectRef::ById(id) => self
                .conn
                .query_row(
                    &format!("{SUBJECT_SELECT_SQL} WHERE SubjectID = ?1;"),
                    [id],
                    read_subject_columns,
                )
                .optional()?,
            SubjectRef::ByName(name) => self
                .conn
                .query_row(
                    &format!("{SUBJECT_SELECT_SQL} WHERE SubjectName = ?1;"),
                    [name],
                    read_subject_columns,
                )
                .optional()?,
        };

        debug!(
            "event=subject_lookup module=repo status=ok found={}",
            row.is_some()
        );
        row.map(SubjectColumns::into_subject).transpose()
    }

    fn list_subjects(&self) -> RepoResult<Vec<Subject>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SUBJECT_SELECT_SQL} ORDER BY SubjectID ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut subjects = Vec::new();
        while let Some(row) = rows.next()? {
            subjects.push(read_subject_columns(row)?.into_subject()?);
        }
        Ok(subjects)
    }

    fn list_subject_summaries(&self) -> RepoResult<Vec<SubjectSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                s.SubjectID AS SubjectID,
                s.SubjectName AS SubjectName,
                s.CreationDate AS CreationDate,
                COUNT(e.EntryID) AS EntryCount
             FROM Subject s
             LEFT JOIN Entry e ON e.SubjectID = s.SubjectID
             GROUP BY s.SubjectID
             ORDER BY s.SubjectID ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut summaries = Vec::new();
        while let Some(row) = rows.next()? {
            let subject = read_subject_columns(row)?.into_subject()?;
            let entry_count: i64 = row.get("EntryCount")?;
            summaries.push(SubjectSummary {
                subject,
                entry_count: count_to_u64(entry_count)?,
            });
        }
        Ok(summaries)
    }

    fn count_subjects(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM Subject;", [], |row| row.get(0))?;
        count_to_u64(count)
    }
}

/// Raw column values; timestamp parsing happens outside the rusqlite closure
/// so format errors map to `RepoError::InvalidData`.
struct SubjectColumns {
    id: SubjectId,
    name: String,
    created_at: String,
}

impl SubjectColumns {
    fn into_subject(self) -> RepoResult<Subject> {
        Ok(Subject {
            id: self.id,
            name: self.name,
            created_at: parse_stored_timestamp(&self.created_at, "Subject.CreationDate")?,
        })
    }
}

fn read_subject_columns(row: &Row<'_>) -> rusqlite::Result<SubjectColumns> {
    Ok(SubjectColumns {
        id: row.get("SubjectID")?,
        name: row.get("SubjectName")?,
        created_at: row.get("CreationDate")?,
    })
}

pub(crate) fn count_to_u64(value: i64) -> RepoResult<u64> {
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative row count `{value}`")))
}
