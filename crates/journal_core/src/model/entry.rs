//! Entry domain model.
//!
//! # Invariants
//! - Every entry belongs to exactly one existing subject.
//! - Entries are immutable; they can only be created or deleted.

use super::subject::SubjectId;
use super::ValidationError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Storage-assigned entry identifier.
pub type EntryId = i64;

/// A single timestamped journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub subject_id: SubjectId,
    /// Display ordering key.
    pub entry_date: NaiveDateTime,
    pub detail: String,
    pub created_at: NaiveDateTime,
}

/// Display order for entry listings.
///
/// Ties on `entry_date` are broken by id so insertion order is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl EntryOrder {
    pub(crate) fn sql_direction(self) -> &'static str {
        match self {
            Self::NewestFirst => "DESC",
            Self::OldestFirst => "ASC",
        }
    }
}

/// Rejects empty or whitespace-only entry bodies.
pub fn validate_detail(detail: &str) -> Result<(), ValidationError> {
    if detail.trim().is_empty() {
        return Err(ValidationError::EmptyDetail);
    }
    Ok(())
}
