//! Snapshot recovery tests for the waylog binary.
//!
//! These tests verify the system can handle:
//! - Corrupted snapshot files
//! - Truncated writes
//! - Snapshots with an unexpected shape
//!
//! The store's contract is that a bad snapshot reads as "no prior
//! workouts"; the session must start, and the next successful save
//! replaces the bad file entirely.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("waylog"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"));
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn session(temp_dir: &TempDir, script: &str) -> assert_cmd::assert::Assert {
    cli(temp_dir)
        .arg("session")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .arg("--lat")
        .arg("52.52")
        .arg("--lng")
        .arg("13.40")
        .write_stdin(script.to_string())
        .assert()
}

#[test]
fn test_corrupted_snapshot_starts_empty() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("workouts.json"), "{ invalid json }}}}").unwrap();

    session(&temp_dir, "list\nquit\n")
        .success()
        .stdout(predicate::str::contains("No workouts logged yet."));
}

#[test]
fn test_truncated_snapshot_is_replaced_on_next_save() {
    let temp_dir = setup_test_dir();

    // Simulate a crash mid-write: valid prefix, cut off partway through
    fs::write(
        temp_dir.path().join("workouts.json"),
        r#"[{"id":"00000000-0000-0000-0000-000000000000","date":"2025-04-"#,
    )
    .unwrap();

    session(&temp_dir, "click 40.0 -73.9\nsave running 5 25 178\nquit\n")
        .success()
        .stdout(predicate::str::contains("Workout saved"));

    let raw = fs::read_to_string(temp_dir.path().join("workouts.json")).unwrap();
    let snapshot: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(snapshot.as_array().unwrap().len(), 1);
}

#[test]
fn test_snapshot_with_wrong_shape_starts_empty() {
    let temp_dir = setup_test_dir();

    // Valid JSON, but not an array of workouts
    fs::write(
        temp_dir.path().join("workouts.json"),
        r#"{"workouts": "everywhere"}"#,
    )
    .unwrap();

    cli(&temp_dir)
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts logged yet."));
}

#[test]
fn test_malformed_position_fix_degrades_to_no_map() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("position.json"), "garbage").unwrap();

    // No fallback home configured, so the session runs map-less
    cli(&temp_dir)
        .arg("session")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("quit\n".to_string())
        .assert()
        .success()
        .stdout(predicate::str::contains("Could not get your location."));
}
