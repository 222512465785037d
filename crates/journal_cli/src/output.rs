//! Text rendering for command results.

use journal_core::model::timestamp::format_timestamp;
use journal_core::{EntriesListResult, EntryOrder, JournalStats, SubjectSummary};

const RULE_WIDTH: usize = 50;

pub fn render_subjects(subjects: &[SubjectSummary]) -> String {
    if subjects.is_empty() {
        return "No subjects found.\n".to_string();
    }

    let mut out = String::from("All subjects:\n");
    for summary in subjects {
        let noun = if summary.entry_count == 1 { "entry" } else { "entries" };
        out.push_str(&format!(
            "ID: {} - {} ({} {}, created {})\n",
            summary.subject.id,
            summary.subject.name,
            summary.entry_count,
            noun,
            format_timestamp(&summary.subject.created_at)
        ));
    }
    out
}

pub fn render_entries(listed: &EntriesListResult) -> String {
    let mut out = format!("{}\n", listed.message);
    if listed.items.is_empty() {
        return out;
    }

    let direction = match listed.order {
        EntryOrder::NewestFirst => "newest to oldest",
        EntryOrder::OldestFirst => "oldest to newest",
    };
    let rule = "-".repeat(RULE_WIDTH);
    out.push_str(&format!("\n===== Entries (sorted {direction}) =====\n"));
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    for entry in &listed.items {
        out.push_str(&format!(
            "ID: {}\n[{}]\n{}\n{rule}\n",
            entry.id,
            format_timestamp(&entry.entry_date),
            entry.detail
        ));
    }
    out
}

pub fn render_stats(stats: &JournalStats) -> String {
    format!(
        "Total Subjects: {}\nTotal Entries: {}\nDatabase Size: {}\n",
        stats.total_subjects,
        stats.total_entries,
        human_size(stats.database_size_bytes)
    )
}

fn human_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * 1024;
    match bytes {
        b if b < KIB => format!("{b} bytes"),
        b if b < MIB => format!("{:.1} KB", b as f64 / KIB as f64),
        b => format!("{:.1} MB", b as f64 / MIB as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::{human_size, render_entries, render_subjects};
    use journal_core::model::timestamp::parse_timestamp;
    use journal_core::{EntriesListResult, Entry, EntryOrder, Subject, SubjectSummary};

    fn work() -> Subject {
        Subject {
            id: 1,
            name: "Work".to_string(),
            created_at: parse_timestamp("2024-01-01 09:00:00").unwrap(),
        }
    }

    #[test]
    fn test_human_size_units() {
        assert_eq!(human_size(512), "512 bytes");
        assert_eq!(human_size(2048), "2.0 KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_render_subjects_lists_counts() {
        let rendered = render_subjects(&[SubjectSummary {
            subject: work(),
            entry_count: 1,
        }]);
        assert!(rendered.contains("ID: 1 - Work (1 entry, created 2024-01-01 09:00:00)"));
        assert_eq!(render_subjects(&[]), "No subjects found.\n");
    }

    #[test]
    fn test_render_entries_shows_id_date_and_detail() {
        let listed = EntriesListResult {
            subject: work(),
            items: vec![Entry {
                id: 7,
                subject_id: 1,
                entry_date: parse_timestamp("2024-01-02 10:30:00").unwrap(),
                detail: "Completed the report".to_string(),
                created_at: parse_timestamp("2024-01-02 10:30:00").unwrap(),
            }],
            order: EntryOrder::NewestFirst,
            message: "Found 1 entry for 'Work'.".to_string(),
        };

        let rendered = render_entries(&listed);
        assert!(rendered.starts_with("Found 1 entry for 'Work'.\n"));
        assert!(rendered.contains("sorted newest to oldest"));
        assert!(rendered.contains("ID: 7\n[2024-01-02 10:30:00]\nCompleted the report\n"));
    }
}
