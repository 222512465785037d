//! Plain-text export of one subject's entries.
//!
//! # Invariants
//! - Export files are created new; an existing file is never overwritten.
//!   A name taken by an earlier export in the same second gets a `_N` suffix.
//! - Entry details are written verbatim.

use crate::model::entry::Entry;
use crate::model::subject::Subject;
use crate::model::timestamp::format_timestamp;
use crate::repo::RepoError;
use chrono::NaiveDateTime;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter, Write as _};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

const HEAVY_RULE_WIDTH: usize = 60;
const LIGHT_RULE_WIDTH: usize = 50;
const MAX_NAME_SUFFIX: u32 = 100;

#[derive(Debug)]
pub enum ExportError {
    Repo(RepoError),
    /// The subject exists but has no entries.
    NothingToExport(String),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::NothingToExport(name) => write!(f, "no entries to export for '{name}'"),
            Self::Io(err) => write!(f, "failed to write export: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::NothingToExport(_) => None,
        }
    }
}

impl From<RepoError> for ExportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Builds `journal_export_<name>_<YYYYmmdd_HHMMSS>.txt`, or
/// `..._<YYYYmmdd_HHMMSS>_<suffix>.txt` when `suffix` is non-zero.
///
/// The name keeps alphanumerics, space, `-` and `_`.
pub fn export_file_name(subject_name: &str, exported_at: NaiveDateTime, suffix: u32) -> String {
    let safe: String = subject_name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(*c, ' ' | '-' | '_'))
        .collect();
    let safe = match safe.trim() {
        "" => "subject",
        trimmed => trimmed,
    };
    let stamp = exported_at.format("%Y%m%d_%H%M%S");
    match suffix {
        0 => format!("journal_export_{safe}_{stamp}.txt"),
        n => format!("journal_export_{safe}_{stamp}_{n}.txt"),
    }
}

/// Renders the export document.
pub fn render_export(subject_name: &str, entries: &[Entry], exported_at: NaiveDateTime) -> String {
    let heavy = "=".repeat(HEAVY_RULE_WIDTH);
    let light = "-".repeat(LIGHT_RULE_WIDTH);

    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "Journal Export - Subject: {subject_name}");
    let _ = writeln!(out, "Export Date: {}", format_timestamp(&exported_at));
    let _ = writeln!(out, "Total Entries: {}", entries.len());
    let _ = writeln!(out, "{heavy}\n");
    for entry in entries {
        let _ = writeln!(
            out,
            "[Entry #{}] - {}",
            entry.id,
            format_timestamp(&entry.entry_date)
        );
        let _ = writeln!(out, "{light}");
        let _ = writeln!(out, "{}", entry.detail);
        let _ = writeln!(out, "{heavy}\n");
    }
    out
}

/// Writes the export document into `out_dir` and returns the file path.
pub fn write_export(
    out_dir: &Path,
    subject: &Subject,
    entries: &[Entry],
    exported_at: NaiveDateTime,
) -> Result<PathBuf, ExportError> {
    if entries.is_empty() {
        return Err(ExportError::NothingToExport(subject.name.clone()));
    }

    let document = render_export(&subject.name, entries, exported_at);

    let written = std::fs::create_dir_all(out_dir).and_then(|()| {
        let (path, mut file) = create_export_file(out_dir, &subject.name, exported_at)?;
        file.write_all(document.as_bytes())?;
        file.flush()?;
        Ok(path)
    });

    match written {
        Ok(path) => {
            info!(
                "event=entries_export module=service status=ok subject_id={} count={}",
                subject.id,
                entries.len()
            );
            Ok(path)
        }
        Err(err) => {
            error!(
                "event=entries_export module=service status=error subject_id={} error_code=export_write_failed error={}",
                subject.id, err
            );
            Err(err.into())
        }
    }
}

fn create_export_file(
    out_dir: &Path,
    subject_name: &str,
    exported_at: NaiveDateTime,
) -> std::io::Result<(PathBuf, File)> {
    let mut suffix = 0;
    loop {
        let path = out_dir.join(export_file_name(subject_name, exported_at, suffix));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists && suffix < MAX_NAME_SUFFIX => {
                suffix += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, render_export, write_export};
    use crate::model::entry::Entry;
    use crate::model::subject::Subject;
    use crate::model::timestamp::parse_timestamp;

    fn entry(id: i64, detail: &str) -> Entry {
        let at = parse_timestamp("2024-04-30 18:00:00").unwrap();
        Entry {
            id,
            subject_id: 1,
            entry_date: at,
            detail: detail.to_string(),
            created_at: at,
        }
    }

    #[test]
    fn file_name_strips_unsafe_characters() {
        let at = parse_timestamp("2024-05-01 09:08:07").unwrap();
        assert_eq!(
            export_file_name("Work/Notes: Q2!", at, 0),
            "journal_export_WorkNotes Q2_20240501_090807.txt"
        );
        assert_eq!(
            export_file_name("???", at, 0),
            "journal_export_subject_20240501_090807.txt"
        );
        assert_eq!(
            export_file_name("Work", at, 2),
            "journal_export_Work_20240501_090807_2.txt"
        );
    }

    #[test]
    fn render_includes_header_and_each_entry() {
        let at = parse_timestamp("2024-05-01 09:08:07").unwrap();
        let entries = vec![entry(4, "Completed the report")];

        let document = render_export("Work", &entries, at);
        assert!(document.starts_with("Journal Export - Subject: Work\n"));
        assert!(document.contains("Export Date: 2024-05-01 09:08:07\n"));
        assert!(document.contains("Total Entries: 1\n"));
        assert!(document.contains("[Entry #4] - 2024-04-30 18:00:00\n"));
        assert!(document.contains("\nCompleted the report\n"));
    }

    #[test]
    fn exports_in_the_same_second_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let at = parse_timestamp("2024-05-01 09:08:07").unwrap();
        let subject = Subject {
            id: 1,
            name: "Work".to_string(),
            created_at: at,
        };
        let entries = vec![entry(1, "first")];

        let first = write_export(dir.path(), &subject, &entries, at).unwrap();
        let second = write_export(dir.path(), &subject, &entries, at).unwrap();

        assert_ne!(first, second);
        assert_eq!(
            second.file_name().unwrap(),
            "journal_export_Work_20240501_090807_1.txt"
        );
        assert_eq!(
            std::fs::read_to_string(&first).unwrap(),
            std::fs::read_to_string(&second).unwrap()
        );
    }
}
