// Exit status of the fsstress binary: 0 on success, 1 on any failure

#![allow(deprecated)] // Command::cargo_bin is deprecated but still functional

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn fsstress() -> Command {
    Command::cargo_bin("fsstress").unwrap()
}

#[test]
fn test_unknown_flag_exits_1() {
    fsstress()
        .args(["-f", "/tmp", "--no-such-flag"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--no-such-flag"));
}

#[test]
fn test_missing_folder_exits_1() {
    fsstress().assert().code(1);
}

#[test]
fn test_non_numeric_threads_exits_1() {
    fsstress().args(["-f", "/tmp", "-t", "many"]).assert().code(1);
}

#[test]
fn test_help_exits_0() {
    fsstress()
        .arg("--help")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("--folder"));
}

#[test]
fn test_dry_run_exits_0_without_touching_folder() {
    let tmp_dir = TempDir::new().unwrap();
    let log = tmp_dir.path().join("results.csv");

    fsstress()
        .arg("-f")
        .arg(tmp_dir.path())
        .arg("-l")
        .arg(&log)
        .arg("--dry-run")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Dry run mode"));

    assert!(!log.exists());
    assert!(!tmp_dir.path().join("FileCreates0").exists());
}

#[test]
fn test_completed_run_exits_0_and_appends_log() {
    let tmp_dir = TempDir::new().unwrap();
    let log = tmp_dir.path().join("results.csv");

    fsstress()
        .arg("-f")
        .arg(tmp_dir.path())
        .arg("-l")
        .arg(&log)
        .args(["-t", "2", "-d", "1", "--phases", "create"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("FileCreate, 2, "));

    let contents = fs::read_to_string(&log).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.starts_with("FileCreate, 2, "));
}

#[test]
fn test_runtime_failure_exits_1() {
    let tmp_dir = TempDir::new().unwrap();
    let log = tmp_dir.path().join("missing").join("results.csv");

    fsstress()
        .arg("-f")
        .arg(tmp_dir.path())
        .arg("-l")
        .arg(&log)
        .args(["-d", "1", "--phases", "create"])
        .assert()
        .code(1);
}
