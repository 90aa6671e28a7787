//! CLI integration tests for the sqlsplit binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper: get a Command for the sqlsplit binary.
fn sqlsplit() -> Command {
    Command::cargo_bin("sqlsplit").expect("binary should exist")
}

/// Helper: create a temp directory with SQL files.
fn setup_temp_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }
    dir
}

// ─── Stdin mode ───

#[test]
fn test_stdin_splits_statements() {
    sqlsplit()
        .arg("-")
        .write_stdin("SELECT 1; SELECT 2;\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("-- statement 1")
                .and(predicate::str::contains("-- statement 2"))
                .and(predicate::str::contains("SELECT 2;")),
        );
}

#[test]
fn test_stdin_count() {
    sqlsplit()
        .arg("-")
        .arg("--count")
        .write_stdin("SELECT 1; SELECT 2; SELECT 3;\n")
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_stdin_strip_semicolon() {
    sqlsplit()
        .arg("-")
        .arg("--strip-semicolon")
        .write_stdin("SELECT 1;\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(";").not());
}

#[test]
fn test_stdin_oracle_dialect() {
    sqlsplit()
        .args(["-", "--dialect", "oracle", "--count"])
        .write_stdin("BEGIN NULL; END;\n/\nSELECT 1 FROM dual;\n")
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn test_stdin_unsupported_dialect_fails() {
    sqlsplit()
        .args(["-", "--dialect", "db2"])
        .write_stdin("SELECT 1;\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unsupported SQL dialect"));
}

#[test]
fn test_stdin_empty_input() {
    sqlsplit()
        .arg("-")
        .arg("--count")
        .write_stdin("-- nothing here\n")
        .assert()
        .success()
        .stdout("0\n");
}

// ─── File mode ───

#[test]
fn test_file_is_split() {
    let dir = setup_temp_dir(&[("migration.sql", "CREATE TABLE t (id INT);\nSELECT 1;\n")]);
    sqlsplit()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("-- statement 2"))
        .stderr(predicate::str::contains("1 file(s) processed"));
}

#[test]
fn test_non_sql_files_are_skipped() {
    let dir = setup_temp_dir(&[
        ("a.sql", "SELECT 1;\n"),
        ("notes.txt", "not sql at all"),
    ]);
    sqlsplit()
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("1 file(s) processed"));
}

#[test]
fn test_count_mode_per_file() {
    let dir = setup_temp_dir(&[("q.sql", "SELECT 1; SELECT 2;\n")]);
    sqlsplit()
        .arg("--count")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 statement(s)"));
}

#[test]
fn test_check_mode_quiet_prints_nothing_on_success() {
    let dir = setup_temp_dir(&[("q.sql", "SELECT 1;\n")]);
    sqlsplit()
        .arg("--check")
        .arg("--quiet")
        .arg(dir.path())
        .assert()
        .success()
        .stdout("");
}

#[test]
fn test_exclude_pattern() {
    let dir = setup_temp_dir(&[
        ("keep.sql", "SELECT 1;\n"),
        ("skip_me.sql", "SELECT 2;\n"),
    ]);
    sqlsplit()
        .arg("--exclude")
        .arg("skip_*")
        .arg(dir.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("1 file(s) processed"));
}

// ─── Config file ───

#[test]
fn test_config_file_sets_dialect() {
    let dir = setup_temp_dir(&[
        ("sqlsplit.toml", "dialect = \"tsql\"\n"),
        ("batch.sql", "SELECT 1;\nGO\nSELECT 2;\n"),
    ]);
    sqlsplit()
        .arg("--count")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 statement(s)"));
}

#[test]
fn test_cli_dialect_overrides_config() {
    let dir = setup_temp_dir(&[
        ("sqlsplit.toml", "dialect = \"tsql\"\n"),
        ("batch.sql", "SELECT 1; SELECT 2;\n"),
    ]);
    // tsql would hold both statements in one GO-less batch; postgres splits.
    sqlsplit()
        .args(["--count", "--dialect", "postgres"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 statement(s)"));
}

#[test]
fn test_unknown_config_key_is_rejected() {
    let dir = setup_temp_dir(&[
        ("sqlsplit.toml", "line_length = 88\n"),
        ("q.sql", "SELECT 1;\n"),
    ]);
    sqlsplit()
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown config option"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let dir = setup_temp_dir(&[("q.sql", "SELECT 1;\n")]);
    sqlsplit()
        .arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Configuration error"));
}
