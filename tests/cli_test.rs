//! CLI integration tests for the sqlish binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper: get a Command for the sqlish binary.
fn sqlish() -> Command {
    let mut cmd = Command::cargo_bin("sqlish").expect("binary should exist");
    // Keep user-level config out of the way.
    cmd.env("XDG_CONFIG_HOME", "/nonexistent").env("HOME", "/nonexistent");
    cmd
}

/// Helper: create a temp directory with the given files.
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

// ─── stdin ───

#[test]
fn test_stdin_string_output() {
    let dir = setup_temp_dir(&[]);
    sqlish()
        .current_dir(dir.path())
        .arg("-")
        .write_stdin("SELECT   *   FROM  t\n")
        .assert()
        .success()
        .stdout("SELECT * FROM t\n");
}

#[test]
fn test_stdin_fragments_output() {
    let dir = setup_temp_dir(&[]);
    sqlish()
        .current_dir(dir.path())
        .args(["--format", "fragments", "-"])
        .write_stdin("select * from t")
        .assert()
        .success()
        .stdout(predicate::str::contains("Keyword\t\"select\""))
        .stdout(predicate::str::contains("Generic\t\"*\""))
        .stdout(predicate::str::contains("Identifier\t\"t\""));
}

#[test]
fn test_stdin_markup_without_color_is_plain_text() {
    let dir = setup_temp_dir(&[]);
    sqlish()
        .current_dir(dir.path())
        .args(["--format", "markup", "--color", "never", "-"])
        .write_stdin("select  'a'  ,  1")
        .assert()
        .success()
        .stdout("select 'a', 1\n");
}

#[test]
fn test_stdin_markup_with_color_emits_escapes() {
    let dir = setup_temp_dir(&[]);
    sqlish()
        .current_dir(dir.path())
        .args(["--format", "markup", "--color", "always", "-"])
        .write_stdin("select 1")
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{1b}["));
}

#[test]
fn test_stdin_fallback_returns_raw_input() {
    let dir = setup_temp_dir(&[]);
    let raw = "((((  ((";
    sqlish()
        .current_dir(dir.path())
        .args(["--max-nesting-depth", "3", "-"])
        .write_stdin(raw)
        .assert()
        .success()
        .stdout(format!("{}\n", raw));
}

// ─── Files ───

#[test]
fn test_single_file() {
    let dir = setup_temp_dir(&[("query.sql", "select a ,b\nfrom t\n")]);
    sqlish()
        .arg(dir.path().join("query.sql"))
        .assert()
        .success()
        .stdout("select a, b from t\n")
        .stderr(predicate::str::contains("1 file(s) processed, 1 formatted"));
}

#[test]
fn test_multiple_files_get_headers() {
    let dir = setup_temp_dir(&[("a.sql", "select   1"), ("b.sql", "select   2")]);
    sqlish()
        .arg(dir.path().join("a.sql"))
        .arg(dir.path().join("b.sql"))
        .assert()
        .success()
        .stdout(predicate::str::contains("a.sql\nselect 1\n"))
        .stdout(predicate::str::contains("b.sql\nselect 2\n"))
        .stderr(predicate::str::contains("2 file(s) processed"));
}

#[test]
fn test_fallback_is_counted() {
    let dir = setup_temp_dir(&[("deep.sql", &"(".repeat(100))]);
    sqlish()
        .arg(dir.path().join("deep.sql"))
        .assert()
        .success()
        .stderr(predicate::str::contains("1 left as-is"));
}

#[test]
fn test_missing_file_exits_with_error() {
    let dir = setup_temp_dir(&[]);
    sqlish()
        .arg(dir.path().join("missing.sql"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("1 error(s)"))
        .stderr(predicate::str::contains("missing.sql"));
}

#[test]
fn test_quiet_suppresses_summary() {
    let dir = setup_temp_dir(&[("query.sql", "select 1")]);
    sqlish()
        .arg("--quiet")
        .arg(dir.path().join("query.sql"))
        .assert()
        .success()
        .stderr(predicate::str::contains("processed").not());
}

// ─── Configuration ───

#[test]
fn test_config_file_discovered_in_cwd() {
    let dir = setup_temp_dir(&[("sqlish.toml", "max_token_count = 3\n")]);
    sqlish()
        .current_dir(dir.path())
        .arg("-")
        .write_stdin("a  b  c")
        .assert()
        .success()
        .stdout("a  b  c\n");
}

#[test]
fn test_explicit_config_path() {
    let dir = setup_temp_dir(&[("custom.toml", "dialect = \"postgres\"\n")]);
    sqlish()
        .arg("--config")
        .arg(dir.path().join("custom.toml"))
        .args(["--format", "fragments", "-"])
        .write_stdin("[x]")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generic\t\"[\""));
}

#[test]
fn test_invalid_config_fails() {
    let dir = setup_temp_dir(&[("sqlish.toml", "line_length = 88\n")]);
    sqlish()
        .current_dir(dir.path())
        .arg("-")
        .write_stdin("select 1")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_unknown_dialect_fails() {
    let dir = setup_temp_dir(&[]);
    sqlish()
        .current_dir(dir.path())
        .args(["--dialect", "oracle", "-"])
        .write_stdin("select 1")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("oracle"));
}

#[test]
fn test_no_args_is_usage_error() {
    sqlish().assert().failure();
}
