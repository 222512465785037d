//! Journal domain model.
//!
//! # Responsibility
//! - Define the value objects exchanged between repositories and callers.
//! - Own field validation and the timestamp text format.
//!
//! # Invariants
//! - Identifiers are storage-assigned integers and never reused by callers.
//! - Timestamps are local wall-clock time with second precision.

pub mod entry;
pub mod subject;
pub mod timestamp;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Required-field validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptySubjectName,
    EmptyDetail,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySubjectName => write!(f, "subject name cannot be empty"),
            Self::EmptyDetail => write!(f, "entry detail cannot be empty"),
        }
    }
}

impl Error for ValidationError {}
