//! Corruption recovery tests for the liftplan binary.
//!
//! These tests verify the system can handle:
//! - Corrupted catalog and routine files
//! - Partial writes
//! - Foreign program keys

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write as IoWrite;
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("liftplan"));
    cmd.env_remove("LIFTPLAN_API_KEY")
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("liftplan-tests-no-config"));
    cmd
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_corrupted_catalog_lines_ignored() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(
        data_dir.join("catalog.jsonl"),
        "{ invalid json }\n{\"id\":3,\"name\":\"Push-ups\",\"muscle_group\":\"Chest\",\"exercise_type\":\"gym\"}\n",
    )
    .unwrap();

    cli()
        .args(["generate", "--offline", "--save", "--yes", "--equipment", "bodyweight", "--data-dir"])
        .arg(data_dir)
        .assert()
        .success();

    // New entries continue after the highest readable id
    let content = fs::read_to_string(data_dir.join("catalog.jsonl")).unwrap();
    assert!(content.contains("\"id\":4"));
}

#[test]
fn test_partial_routine_line() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let routines_path = data_dir.join("routines.jsonl");

    let mut file = fs::File::create(&routines_path).unwrap();
    writeln!(
        file,
        r#"{{"id":1,"name":"Old Day","program_id":"ai|Old|1","exercises":[],"created_at":"2024-01-15T10:30:00Z"}}"#
    )
    .unwrap();
    // Simulate a crash mid-write
    write!(file, r#"{{"id":2,"name":"Trunc"#).unwrap();
    drop(file);

    cli()
        .arg("programs")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Old"));
}

#[test]
fn test_foreign_program_key_listed_raw() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    fs::write(
        data_dir.join("routines.jsonl"),
        r#"{"id":1,"name":"Manual","program_id":"handmade","exercises":[],"created_at":"2024-01-15T10:30:00Z"}
"#,
    )
    .unwrap();

    cli()
        .arg("programs")
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("handmade"));
}

#[test]
fn test_export_unknown_key_fails() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["export", "ai|Nope|1", "--output"])
        .arg(temp_dir.path().join("out.csv"))
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .failure();

    assert!(!temp_dir.path().join("out.csv").exists());
}
