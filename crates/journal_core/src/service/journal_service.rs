//! Journal use-case service.
//!
//! # Responsibility
//! - Provide the journal entry points used by the session and CLI.
//! - Attach informational status messages to entry listings.
//! - Aggregate statistics and drive plain-text export.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.
//! - Status messages are informational; failures are always `Err`.

use crate::model::entry::{Entry, EntryId, EntryOrder};
use crate::model::subject::{Subject, SubjectId, SubjectRef, SubjectSummary};
use crate::model::timestamp::now_local;
use crate::repo::entry_repo::EntryRepository;
use crate::repo::subject_repo::SubjectRepository;
use crate::repo::RepoResult;
use crate::service::export::{write_export, ExportError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Entry listing envelope returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntriesListResult {
    pub subject: Subject,
    /// Entries in `order`.
    pub items: Vec<Entry>,
    pub order: EntryOrder,
    /// Human-readable summary such as `Found 3 entries for 'Work'.`
    pub message: String,
}

/// Whole-journal counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalStats {
    pub total_subjects: u64,
    pub total_entries: u64,
    /// Size of the backing file; `0` for in-memory storage.
    pub database_size_bytes: u64,
}

/// Journal service facade over repository implementations.
pub struct JournalService<S: SubjectRepository, E: EntryRepository> {
    subjects: S,
    entries: E,
}

impl<S: SubjectRepository, E: EntryRepository> JournalService<S, E> {
    /// Creates a service using the provided repository implementations.
    pub fn new(subjects: S, entries: E) -> Self {
        Self { subjects, entries }
    }

    pub fn add_subject(&self, name: &str) -> RepoResult<SubjectId> {
        self.subjects.insert_subject(name)
    }

    /// Returns the named subject's id, creating the subject when absent.
    ///
    /// A typo in `name` silently yields a new subject; callers that need
    /// strict lookup should use `SubjectRef` resolution instead.
    pub fn find_or_create_subject(&self, name: &str) -> RepoResult<SubjectId> {
        self.subjects.find_or_create_subject(name)
    }

    /// Adds an entry dated now. See `add_entry_at`.
    pub fn add_entry(&self, subject: &SubjectRef, detail: &str) -> RepoResult<EntryId> {
        self.add_entry_at(subject, detail, now_local())
    }

    /// Adds an entry with an explicit entry date.
    ///
    /// # Contract
    /// - `SubjectRef::ByName` auto-creates a missing subject.
    /// - `SubjectRef::ById` of a missing subject fails with `SubjectNotFound`.
    /// - Empty `detail` fails with `Validation` before anything is written.
    pub fn add_entry_at(
        &self,
        subject: &SubjectRef,
        detail: &str,
        entry_date: NaiveDateTime,
    ) -> RepoResult<EntryId> {
        self.entries.insert_entry(subject, detail, entry_date)
    }

    pub fn list_subjects(&self) -> RepoResult<Vec<Subject>> {
        self.subjects.list_subjects()
    }

    pub fn list_subject_summaries(&self) -> RepoResult<Vec<SubjectSummary>> {
        self.subjects.list_subject_summaries()
    }

    /// Lists entries of an existing subject with a status message.
    pub fn entries_for_subject(
        &self,
        subject: &SubjectRef,
        order: EntryOrder,
    ) -> RepoResult<EntriesListResult> {
        let listed = self.entries.list_entries(subject, order)?;
        let message = entries_message(&listed.subject.name, listed.entries.len());
        Ok(EntriesListResult {
            subject: listed.subject,
            items: listed.entries,
            order,
            message,
        })
    }

    pub fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        self.entries.delete_entry(id)
    }

    pub fn stats(&self, database_size_bytes: u64) -> RepoResult<JournalStats> {
        Ok(JournalStats {
            total_subjects: self.subjects.count_subjects()?,
            total_entries: self.entries.count_entries()?,
            database_size_bytes,
        })
    }

    /// Writes the subject's entries, oldest first, to a new text file in
    /// `out_dir` and returns its path.
    pub fn export_entries(
        &self,
        subject: &SubjectRef,
        out_dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        let listed = self.entries.list_entries(subject, EntryOrder::OldestFirst)?;
        write_export(out_dir, &listed.subject, &listed.entries, now_local())
    }
}

fn entries_message(subject_name: &str, count: usize) -> String {
    match count {
        0 => format!("No entries found for '{subject_name}'."),
        1 => format!("Found 1 entry for '{subject_name}'."),
        n => format!("Found {n} entries for '{subject_name}'."),
    }
}

#[cfg(test)]
mod tests {
    use super::entries_message;

    #[test]
    fn message_reflects_count() {
        assert_eq!(entries_message("Work", 0), "No entries found for 'Work'.");
        assert_eq!(entries_message("Work", 1), "Found 1 entry for 'Work'.");
        assert_eq!(entries_message("Work", 3), "Found 3 entries for 'Work'.");
    }
}
