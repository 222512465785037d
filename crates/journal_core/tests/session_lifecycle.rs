use journal_core::{
    DbError, EntryOrder, ExportError, JournalSession, RepoError, StorageLocation, SubjectRef,
};
use rusqlite::Connection;
use std::time::{Duration, Instant};

#[test]
fn data_survives_close_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.db");

    let mut session = JournalSession::open(&path).unwrap();
    assert_eq!(session.location(), &StorageLocation::File(path.clone()));
    session
        .insert_entry(&SubjectRef::from("Work"), "Completed the report")
        .unwrap();
    session.close().unwrap();

    let reopened = JournalSession::open(&path).unwrap();
    let listed = reopened
        .get_entries_for_subject(&SubjectRef::from("Work"), EntryOrder::NewestFirst)
        .unwrap();
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].detail, "Completed the report");
}

#[test]
fn every_operation_fails_after_close() {
    let mut session = JournalSession::open_in_memory().unwrap();
    session.close().unwrap();

    let closed = |err: RepoError| matches!(err, RepoError::Storage(DbError::ConnectionClosed));
    assert!(closed(session.insert_subject("Work").unwrap_err()));
    assert!(closed(
        session
            .insert_entry(&SubjectRef::from("Work"), "x")
            .unwrap_err()
    ));
    assert!(closed(
        session
            .get_entries_for_subject(&SubjectRef::ById(1), EntryOrder::NewestFirst)
            .unwrap_err()
    ));
    assert!(closed(session.delete_entry(1).unwrap_err()));
    assert!(closed(session.stats().unwrap_err()));
}

#[test]
fn dropping_open_session_then_reopening_sees_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.db");

    {
        let session = JournalSession::open(&path).unwrap();
        session.insert_subject("Work").unwrap();
    }

    let reopened = JournalSession::open(&path).unwrap();
    assert_eq!(reopened.get_all_subjects().unwrap().len(), 1);
}

#[test]
fn file_stats_report_nonzero_size() {
    let dir = tempfile::tempdir().unwrap();
    let session = JournalSession::open(dir.path().join("journal.db")).unwrap();
    session.insert_entry(&SubjectRef::from("Work"), "a").unwrap();

    let stats = session.stats().unwrap();
    assert_eq!(stats.total_subjects, 1);
    assert!(stats.database_size_bytes > 0);
}

#[test]
fn export_writes_entries_oldest_first() {
    let dir = tempfile::tempdir().unwrap();
    let session = JournalSession::open_in_memory().unwrap();
    let work = SubjectRef::from("Work");
    session.insert_entry(&work, "first entry").unwrap();
    session.insert_entry(&work, "second entry").unwrap();

    let path = session.export_entries(&work, dir.path()).unwrap();

    let file_name = path.file_name().unwrap().to_str().unwrap().to_string();
    assert!(file_name.starts_with("journal_export_Work_"));
    let document = std::fs::read_to_string(&path).unwrap();
    assert!(document.contains("Total Entries: 2"));
    let first = document.find("first entry").unwrap();
    let second = document.find("second entry").unwrap();
    assert!(first < second);
}

#[test]
fn export_of_empty_or_unknown_subject_fails() {
    let dir = tempfile::tempdir().unwrap();
    let session = JournalSession::open_in_memory().unwrap();
    session.insert_subject("Empty").unwrap();

    let err = session
        .export_entries(&SubjectRef::from("Empty"), dir.path())
        .unwrap_err();
    assert!(matches!(err, ExportError::NothingToExport(ref name) if name == "Empty"));

    let err = session
        .export_entries(&SubjectRef::from("Unknown"), dir.path())
        .unwrap_err();
    assert!(matches!(
        err,
        ExportError::Repo(RepoError::SubjectNotFound(_))
    ));
}

#[test]
fn back_to_back_exports_both_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let session = JournalSession::open_in_memory().unwrap();
    let work = SubjectRef::from("Work");
    session.insert_entry(&work, "only entry").unwrap();

    let first = session.export_entries(&work, dir.path()).unwrap();
    let second = session.export_entries(&work, dir.path()).unwrap();

    assert_ne!(first, second);
    assert!(first.exists());
    assert!(second.exists());
}

#[test]
fn locked_database_fails_fast_with_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.db");
    let session = JournalSession::open(&path).unwrap();

    let holder = Connection::open(&path).unwrap();
    holder.execute_batch("BEGIN EXCLUSIVE;").unwrap();

    let started = Instant::now();
    let err = session.insert_subject("Work").unwrap_err();
    assert!(matches!(err, RepoError::Storage(DbError::Sqlite(_))));
    assert!(started.elapsed() < Duration::from_secs(2));

    holder.execute_batch("COMMIT;").unwrap();
    session.insert_subject("Work").unwrap();
    assert_eq!(session.get_all_subjects().unwrap().len(), 1);
}
