//! Entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Insert, list and delete rows in the `Entry` table.
//! - Resolve `SubjectRef` values before touching entries.
//!
//! # Invariants
//! - `insert_entry` validates `detail` before any mutation, including
//!   subject auto-creation.
//! - Subject auto-creation and the entry insert commit together or not at all.
//! - Listings order by `EntryDate`, ties broken by `EntryID` in the same
//!   direction.
//! - Deleting an absent id is an error, never a silent no-op.

use super::subject_repo::{count_to_u64, SqliteSubjectRepository, SubjectRepository};
use super::{parse_stored_timestamp, RepoError, RepoResult};
use crate::model::entry::{validate_detail, Entry, EntryId, EntryOrder};
use crate::model::subject::{Subject, SubjectId, SubjectRef};
use crate::model::timestamp::{format_timestamp, now_local};
use chrono::NaiveDateTime;
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};

const ENTRY_SELECT_SQL: &str = "SELECT
    EntryID,
    SubjectID,
    EntryDate,
    Detail,
    CreationDate
FROM Entry";

/// Entries of one resolved subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectEntries {
    pub subject: Subject,
    pub entries: Vec<Entry>,
}

/// Repository interface for entry operations.
pub trait EntryRepository {
    /// Inserts one entry dated `entry_date` and returns its id.
    ///
    /// `SubjectRef::ByName` creates the subject when absent;
    /// `SubjectRef::ById` must already exist.
    fn insert_entry(
        &self,
        subject: &SubjectRef,
        detail: &str,
        entry_date: NaiveDateTime,
    ) -> RepoResult<EntryId>;
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>>;
    /// Lists all entries of an existing subject in `order`.
    fn list_entries(&self, subject: &SubjectRef, order: EntryOrder) -> RepoResult<SubjectEntries>;
    fn delete_entry(&self, id: EntryId) -> RepoResult<()>;
    fn count_entries(&self) -> RepoResult<u64>;
}

/// SQLite-backed entry repository.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
    subjects: SqliteSubjectRepository<'conn>,
}

impl<'conn> SqliteEntryRepository<'conn> {
    /// Constructs a repository from a connection with the schema applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Ok(Self::with_subjects(SqliteSubjectRepository::try_new(conn)?))
    }

    /// Shares the connection of an already constructed subject repository.
    pub fn with_subjects(subjects: SqliteSubjectRepository<'conn>) -> Self {
        Self {
            conn: subjects.connection(),
            subjects,
        }
    }

    fn subject_id_for_insert(&self, subject: &SubjectRef) -> RepoResult<SubjectId> {
        match subject {
            SubjectRef::ById(_) => Ok(self.subjects.resolve_subject(subject)?.id),
            SubjectRef::ByName(name) => self.subjects.find_or_create_subject(name),
        }
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn insert_entry(
        &self,
        subject: &SubjectRef,
        detail: &str,
        entry_date: NaiveDateTime,
    ) -> RepoResult<EntryId> {
        validate_detail(detail)?;

        let tx = self.conn.unchecked_transaction()?;
        let subject_id = self.subject_id_for_insert(subject)?;
        tx.execute(
            "INSERT INTO Entry (SubjectID, EntryDate, Detail, CreationDate)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                subject_id,
                format_timestamp(&entry_date),
                detail,
                format_timestamp(&now_local()),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!("event=entry_insert module=repo status=ok entry_id={id} subject_id={subject_id}");
        Ok(id)
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        let row = self
            .conn
            .query_row(
                &format!("{ENTRY_SELECT_SQL} WHERE EntryID = ?1;"),
                [id],
                read_entry_columns,
            )
            .optional()?;
        row.map(EntryColumns::into_entry).transpose()
    }

    fn list_entries(&self, subject: &SubjectRef, order: EntryOrder) -> RepoResult<SubjectEntries> {
        let subject = self.subjects.resolve_subject(subject)?;

        let direction = order.sql_direction();
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE SubjectID = ?1
             ORDER BY EntryDate {direction}, EntryID {direction};"
        ))?;
        let mut rows = stmt.query([subject.id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(read_entry_columns(row)?.into_entry()?);
        }

        debug!(
            "event=entry_list module=repo status=ok subject_id={} count={}",
            subject.id,
            entries.len()
        );
        Ok(SubjectEntries { subject, entries })
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM Entry WHERE EntryID = ?1;", [id])?;

        if changed == 0 {
            info!("event=entry_delete module=repo status=rejected entry_id={id} error_code=entry_not_found");
            return Err(RepoError::EntryNotFound(id));
        }

        info!("event=entry_delete module=repo status=ok entry_id={id}");
        Ok(())
    }

    fn count_entries(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM Entry;", [], |row| row.get(0))?;
        count_to_u64(count)
    }
}

struct EntryColumns {
    id: EntryId,
    subject_id: SubjectId,
    entry_date: String,
    detail: String,
    created_at: String,
}

impl EntryColumns {
    fn into_entry(self) -> RepoResult<Entry> {
        Ok(Entry {
            id: self.id,
            subject_id: self.subject_id,
            entry_date: parse_stored_timestamp(&self.entry_date, "Entry.EntryDate")?,
            detail: self.detail,
            created_at: parse_stored_timestamp(&self.created_at, "Entry.CreationDate")?,
        })
    }
}

fn read_entry_columns(row: &Row<'_>) -> rusqlite::Result<EntryColumns> {
    Ok(EntryColumns {
        id: row.get("EntryID")?,
        subject_id: row.get("SubjectID")?,
        entry_date: row.get("EntryDate")?,
        detail: row.get("Detail")?,
        created_at: row.get("CreationDate")?,
    })
}
