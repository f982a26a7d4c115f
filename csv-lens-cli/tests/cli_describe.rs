use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

const COUPONS: &str = "\
letter,qty,note
a,1,
b,2,x
a,1,NA
c,,y
b,2,
a,3,x
";

fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("coupons.csv"), COUPONS).unwrap();
    dir
}

// isolate from any user config and RUST_LOG
fn csv_lens(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("csv-lens").unwrap();
    cmd.env("CSV_LENS_CONFIG", dir.join("no-config.toml"))
        .env_remove("RUST_LOG")
        .current_dir(dir);
    cmd
}

#[test]
fn describe_prints_every_column() {
    let dir = fixture();
    csv_lens(dir.path())
        .args(["describe", "coupons.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("File: coupons.csv\nRows: 6\nColumns: 3\n\n"))
        .stdout(predicate::str::contains("Column: letter\n  - dtype: Utf8\n  - non-null: 6 (100.00%)\n  - unique values: 3\n    \"a\": 3\n    \"b\": 2\n    \"c\": 1\n\n"))
        .stdout(predicate::str::contains("Column: note\n  - dtype: Utf8\n  - non-null: 3 (50.00%)\n  - unique values: 3\n    <missing>: 3\n    \"x\": 2\n    \"y\": 1\n"));
}

#[test]
fn describe_truncates_and_excludes_missing() {
    let dir = fixture();
    csv_lens(dir.path())
        .args(["describe", "coupons.csv", "--max-values", "1", "--no-na", "--columns", "qty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Column: qty\n  - dtype: Int64\n  - non-null: 5 (83.33%)\n  - unique values: 3\n  - Top 1 values:\n    1: 2\n  - ...and 2 more unique values (not shown)\n"))
        .stdout(predicate::str::contains("<missing>").not())
        .stdout(predicate::str::contains("Column: letter").not());
}

#[test]
fn zero_max_values_lists_nothing() {
    let dir = fixture();
    csv_lens(dir.path())
        .args(["describe", "coupons.csv", "--max-values", "0", "--columns", "letter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  - Top 0 values:\n  - ...and 3 more unique values (not shown)\n"))
        .stdout(predicate::str::contains("\"a\"").not());
}

#[test]
fn describe_json_is_parseable() {
    let dir = fixture();
    let out = csv_lens(dir.path())
        .args(["describe", "coupons.csv", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["total_rows"], 6);
    assert_eq!(v["columns"][0]["name"], "letter");
    assert_eq!(v["columns"][0]["value_counts"].as_array().unwrap().len(), 3);
}

#[test]
fn missing_file_fails_with_path_on_stderr() {
    let dir = fixture();
    csv_lens(dir.path())
        .args(["describe", "absent.csv"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error reading 'absent.csv'"));
}

#[test]
fn unknown_format_is_rejected() {
    let dir = fixture();
    csv_lens(dir.path())
        .args(["describe", "coupons.csv", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format: yaml"));
}

#[test]
fn export_csv_writes_summary_file() {
    let dir = fixture();
    csv_lens(dir.path())
        .args(["export", "coupons.csv", "--format", "csv", "--output", "out/profile.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported to out/profile.csv"));
    let text = std::fs::read_to_string(dir.path().join("out/profile.csv")).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("column_name,dtype,total_rows,non_null,non_null_ratio,unique_count,top_value,top_count")
    );
    assert_eq!(lines.next(), Some("letter,Utf8,6,6,1.0000,3,\"\"\"a\"\"\",3"));
}

#[test]
fn config_file_sets_defaults() {
    let dir = fixture();
    std::fs::write(dir.path().join("cfg.toml"), "[display]\nmax_values = 1\ninclude_missing = false\n").unwrap();
    csv_lens(dir.path())
        .env("CSV_LENS_CONFIG", dir.path().join("cfg.toml"))
        .args(["describe", "coupons.csv", "--columns", "note"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  - unique values: 2\n  - Top 1 values:\n    \"x\": 2\n  - ...and 1 more unique values (not shown)\n"));
}

#[test]
fn completions_are_generated() {
    let dir = fixture();
    csv_lens(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("csv-lens"));
}
