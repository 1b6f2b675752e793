//! CLI integration tests for the `textstat` binary.
//!
//! Uses `assert_cmd` to spawn the binary and verify exit codes, stdout
//! content, and stderr content.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper: create a Command for the `textstat` binary.
fn textstat() -> Command {
    cargo_bin_cmd!("textstat")
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    textstat()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Text statistics service and tools"));
}

#[test]
fn version_exits_0() {
    textstat()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("textstat"));
}

#[test]
fn serve_help_lists_flags() {
    textstat()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--workers"));
}

#[test]
fn unknown_subcommand_fails() {
    textstat().arg("frobnicate").assert().failure();
}

// ──────────────────────────────────────────────
// 2. stats
// ──────────────────────────────────────────────

#[test]
fn stats_reads_stdin_as_json() {
    let output = textstat()
        .args(["--output", "json", "stats"])
        .write_stdin("Hello world. Second sentence!")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let metrics: serde_json::Value =
        serde_json::from_slice(&output).expect("stats output should be JSON");
    assert_eq!(metrics["numberOfWords"], 4);
    assert_eq!(metrics["numberOfCharacters"], 29);
    assert_eq!(metrics["numberOfSentences"], 2);
    assert_eq!(metrics["numberOfParagraphs"], 1);
    assert_eq!(
        metrics["longestWordsInParagraphs"],
        serde_json::json!(["sentence"])
    );
}

#[test]
fn stats_reads_file_as_text() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("essay.txt");
    fs::write(&path, "First paragraph here.\n\nSecond one, longer words.").unwrap();

    textstat()
        .arg("stats")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("words:      7"))
        .stdout(predicate::str::contains("paragraphs: 2"))
        .stdout(predicate::str::contains("longest:    paragraph, second"));
}

#[test]
fn stats_of_empty_input_is_all_zero() {
    let output = textstat()
        .args(["--output", "json", "stats"])
        .write_stdin("")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let metrics: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(metrics["numberOfWords"], 0);
    assert_eq!(metrics["numberOfParagraphs"], 0);
    assert_eq!(metrics["longestWordsInParagraphs"], serde_json::json!([]));
}

#[test]
fn stats_missing_file_exits_1() {
    textstat()
        .args(["stats", "/nonexistent/textstat/missing.txt"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error reading file"));
}

#[test]
fn stats_missing_file_json_error() {
    textstat()
        .args(["--output", "json", "stats", "/nonexistent/textstat/missing.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("\"error\""));
}

#[test]
fn stats_missing_file_quiet_prints_nothing() {
    textstat()
        .args(["--quiet", "stats", "/nonexistent/textstat/missing.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::is_empty());
}
