//! Audit log durability across monitoring sessions

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use vigil::config::MonitorConfig;
use vigil::monitor::{CancelToken, MonitorSession};

fn new_session(root: PathBuf, report: PathBuf) -> MonitorSession {
    let mut config = MonitorConfig::new(root);
    config.report_path = report;
    MonitorSession::new(config, CancelToken::new()).unwrap()
}

#[test]
fn audit_history_survives_session_restarts() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("watched");
    fs::create_dir(&root).unwrap();
    let report = temp_dir.path().join("report.csv");

    fs::write(root.join("a.txt"), "v1").unwrap();

    // First session observes a modification
    {
        let mut session = new_session(root.clone(), report.clone());
        session.initialize().unwrap();
        fs::write(root.join("a.txt"), "v2").unwrap();
        assert_eq!(session.run_pass().unwrap().modified, 1);
    }
    let first_run = fs::read_to_string(&report).unwrap();
    assert_eq!(first_run.lines().count(), 2);

    // A fresh session starts a new baseline but appends to the same log
    {
        let mut session = new_session(root.clone(), report.clone());
        session.initialize().unwrap();
        // The restarted baseline reflects current content: no replayed events
        assert_eq!(session.run_pass().unwrap().total_events(), 0);

        fs::remove_file(root.join("a.txt")).unwrap();
        assert_eq!(session.run_pass().unwrap().deleted, 1);
    }
    let second_run = fs::read_to_string(&report).unwrap();

    // Append-only: earlier rows are byte-identical and order is preserved
    assert!(second_run.starts_with(&first_run));
    assert_eq!(second_run.lines().count(), 3);
    assert_eq!(
        second_run.matches("Timestamp,File Path,Change Type").count(),
        1
    );
}

#[test]
fn audit_rows_carry_all_three_change_kinds() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("watched");
    fs::create_dir(&root).unwrap();
    let report = temp_dir.path().join("report.csv");

    fs::write(root.join("keep.txt"), "same").unwrap();
    fs::write(root.join("edit.txt"), "before").unwrap();
    fs::write(root.join("drop.txt"), "gone soon").unwrap();

    let mut session = new_session(root.clone(), report.clone());
    session.initialize().unwrap();

    fs::write(root.join("edit.txt"), "after").unwrap();
    fs::remove_file(root.join("drop.txt")).unwrap();
    fs::write(root.join("new.txt"), "created").unwrap();

    let summary = session.run_pass().unwrap();
    assert_eq!(summary.added, 1);
    assert_eq!(summary.modified, 1);
    assert_eq!(summary.deleted, 1);

    let contents = fs::read_to_string(&report).unwrap();
    let rows: Vec<&str> = contents.lines().skip(1).collect();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().any(|r| r.contains("new.txt") && r.ends_with(",added")));
    assert!(rows.iter().any(|r| r.contains("edit.txt") && r.ends_with(",modified")));
    assert!(rows.iter().any(|r| r.contains("drop.txt") && r.ends_with(",deleted")));

    // Timestamp column parses in the documented local format
    for row in rows {
        let timestamp = row.split(',').next().unwrap();
        assert!(
            chrono::NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").is_ok(),
            "unexpected timestamp format: {timestamp}"
        );
    }
}
