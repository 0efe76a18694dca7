//! End-to-end change detection scenarios against a real directory tree

use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;
use vigil::config::MonitorConfig;
use vigil::monitor::{CancelToken, MonitorSession, MonitorState};

/// Session whose audit log lives outside the monitored root
fn session_in(temp_dir: &TempDir) -> (MonitorSession, PathBuf) {
    let root = temp_dir.path().join("watched");
    fs::create_dir_all(&root).unwrap();
    let report = temp_dir.path().join("report.csv");

    let mut config = MonitorConfig::new(root);
    config.report_path = report.clone();
    let session = MonitorSession::new(config, CancelToken::new()).unwrap();
    (session, report)
}

#[test]
fn modified_file_is_reported_once() {
    let temp_dir = TempDir::new().unwrap();
    let (mut session, report) = session_in(&temp_dir);
    let root = temp_dir.path().join("watched");

    fs::write(root.join("a.txt"), "original a").unwrap();
    fs::write(root.join("b.txt"), "original b").unwrap();
    session.initialize().unwrap();
    assert_eq!(session.baseline().len(), 2);

    fs::write(root.join("b.txt"), "tampered b").unwrap();
    let summary = session.run_pass().unwrap();

    assert_eq!(summary.modified, 1);
    assert_eq!(summary.added, 0);
    assert_eq!(summary.deleted, 0);

    let contents = fs::read_to_string(&report).unwrap();
    let rows: Vec<&str> = contents.lines().skip(1).collect();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].ends_with(",modified"));
    assert!(rows[0].contains("b.txt"));
}

#[test]
fn created_file_is_reported_as_added_and_tracked() {
    let temp_dir = TempDir::new().unwrap();
    let (mut session, report) = session_in(&temp_dir);
    let root = temp_dir.path().join("watched");

    fs::write(root.join("a.txt"), "existing").unwrap();
    session.initialize().unwrap();

    fs::write(root.join("c.txt"), "brand new").unwrap();
    let summary = session.run_pass().unwrap();

    assert_eq!(summary.added, 1);
    assert!(session.baseline().contains(&root.join("c.txt")));

    let contents = fs::read_to_string(&report).unwrap();
    assert!(contents.contains("c.txt"));
    assert!(contents.lines().nth(1).unwrap().ends_with(",added"));

    // Unchanged next pass: no further events for c.txt
    let summary = session.run_pass().unwrap();
    assert_eq!(summary.total_events(), 0);
}

#[test]
fn deleted_file_is_reported_and_untracked() {
    let temp_dir = TempDir::new().unwrap();
    let (mut session, report) = session_in(&temp_dir);
    let root = temp_dir.path().join("watched");

    fs::write(root.join("a.txt"), "doomed").unwrap();
    fs::write(root.join("b.txt"), "survivor").unwrap();
    session.initialize().unwrap();

    fs::remove_file(root.join("a.txt")).unwrap();
    let summary = session.run_pass().unwrap();

    assert_eq!(summary.deleted, 1);
    assert!(!session.baseline().contains(&root.join("a.txt")));
    assert_eq!(session.baseline().len(), 1);

    let contents = fs::read_to_string(&report).unwrap();
    assert!(contents.lines().nth(1).unwrap().ends_with(",deleted"));

    // The deletion is reported exactly once
    let summary = session.run_pass().unwrap();
    assert_eq!(summary.total_events(), 0);
}

#[test]
fn unchanged_tree_produces_no_events_across_passes() {
    let temp_dir = TempDir::new().unwrap();
    let (mut session, report) = session_in(&temp_dir);
    let root = temp_dir.path().join("watched");

    fs::write(root.join("stable.txt"), "never changes").unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(root.join("sub").join("deep.txt"), "also stable").unwrap();
    session.initialize().unwrap();

    for _ in 0..3 {
        let summary = session.run_pass().unwrap();
        assert_eq!(summary.total_events(), 0);
    }

    let contents = fs::read_to_string(&report).unwrap();
    assert_eq!(contents.lines().count(), 1, "header row only");
}

#[cfg(unix)]
#[test]
fn permission_denied_subtree_produces_no_spurious_events() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let (mut session, _report) = session_in(&temp_dir);
    let root = temp_dir.path().join("watched");

    let sub = root.join("locked");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("secret.txt"), "inside").unwrap();
    fs::write(root.join("outside.txt"), "outside").unwrap();
    session.initialize().unwrap();
    assert_eq!(session.baseline().len(), 2);

    fs::set_permissions(&sub, fs::Permissions::from_mode(0o000)).unwrap();

    // When the subtree can't be enumerated its baseline entries are skipped,
    // not reported as deletions; when the process can still read it (e.g.
    // running as root) nothing changed either way. Both cases: zero events.
    let summary = session.run_pass().unwrap();
    assert_eq!(summary.total_events(), 0);
    assert!(session.baseline().contains(&sub.join("secret.txt")));

    // Paths outside the subtree are still compared normally
    fs::write(root.join("outside.txt"), "changed").unwrap();
    let summary = session.run_pass().unwrap();
    assert_eq!(summary.modified, 1);

    fs::set_permissions(&sub, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn run_stops_cleanly_on_cancellation() {
    let temp_dir = TempDir::new().unwrap();
    let (mut session, report) = session_in(&temp_dir);
    let root = temp_dir.path().join("watched");
    fs::write(root.join("a.txt"), "watched content").unwrap();

    let token = session.cancel_token();
    let handle = thread::spawn(move || {
        session.run().unwrap();
        session
    });

    thread::sleep(Duration::from_millis(100));
    token.cancel();
    let session = handle.join().unwrap();

    assert_eq!(session.state(), MonitorState::Stopped);
    // Graceful stop loses nothing already written: the header is intact
    let contents = fs::read_to_string(&report).unwrap();
    assert!(contents.starts_with("Timestamp,File Path,Change Type"));
}

#[test]
fn session_fails_fast_when_root_is_missing() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = MonitorConfig::new(temp_dir.path().join("never_created"));
    config.report_path = temp_dir.path().join("report.csv");

    assert!(MonitorSession::new(config, CancelToken::new()).is_err());
    // No partial state: the audit log was not created either
    assert!(!temp_dir.path().join("report.csv").exists());
}
