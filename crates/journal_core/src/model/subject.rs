//! Subject domain model.
//!
//! # Responsibility
//! - Define the named category that groups journal entries.
//! - Define `SubjectRef`, the explicit id-or-name lookup key.
//!
//! # Invariants
//! - `name` is unique (case-sensitive) and never empty.
//! - Subjects are never updated or deleted once created.

use super::ValidationError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Storage-assigned subject identifier.
pub type SubjectId = i64;

/// A named category under which entries are grouped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    /// Set once at insert.
    pub created_at: NaiveDateTime,
}

/// Subject listing row with its current entry count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSummary {
    #[serde(flatten)]
    pub subject: Subject,
    pub entry_count: u64,
}

/// Caller-supplied reference to a subject.
///
/// Resolution never guesses: `ById` only matches the id column and `ByName`
/// only matches the exact, case-sensitive name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubjectRef {
    ById(SubjectId),
    ByName(String),
}

impl SubjectRef {
    /// Maps raw user input to a reference.
    ///
    /// Input made only of ASCII digits becomes `ById`; anything else is a
    /// name. There is no fallback: an all-digit string never matches a
    /// subject by name, even when no subject has that id. Use
    /// `SubjectRef::ByName` directly (the CLI `--name` flag) for names that
    /// are numbers.
    pub fn parse(input: &str) -> Self {
        if !input.is_empty() && input.bytes().all(|byte| byte.is_ascii_digit()) {
            if let Ok(id) = input.parse::<SubjectId>() {
                return Self::ById(id);
            }
        }
        Self::ByName(input.to_string())
    }
}

impl From<SubjectId> for SubjectRef {
    fn from(value: SubjectId) -> Self {
        Self::ById(value)
    }
}

impl From<&str> for SubjectRef {
    fn from(value: &str) -> Self {
        Self::ByName(value.to_string())
    }
}

impl From<String> for SubjectRef {
    fn from(value: String) -> Self {
        Self::ByName(value)
    }
}

impl Display for SubjectRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ById(id) => write!(f, "#{id}"),
            Self::ByName(name) => write!(f, "'{name}'"),
        }
    }
}

/// Rejects empty or whitespace-only subject names.
pub fn validate_subject_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptySubjectName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_subject_name, SubjectRef};

    #[test]
    fn parse_maps_digits_to_id() {
        assert_eq!(SubjectRef::parse("42"), SubjectRef::ById(42));
        assert_eq!(SubjectRef::parse("2024"), SubjectRef::ById(2024));
    }

    #[test]
    fn parse_keeps_mixed_input_as_name() {
        assert_eq!(
            SubjectRef::parse("Work 2"),
            SubjectRef::ByName("Work 2".to_string())
        );
        assert_eq!(SubjectRef::parse("-1"), SubjectRef::ByName("-1".to_string()));
    }

    #[test]
    fn parse_overflowing_digits_falls_back_to_name() {
        let input = "99999999999999999999999";
        assert_eq!(SubjectRef::parse(input), SubjectRef::ByName(input.to_string()));
    }

    #[test]
    fn blank_names_are_invalid() {
        assert!(validate_subject_name("   ").is_err());
        assert!(validate_subject_name("Work").is_ok());
    }
}
