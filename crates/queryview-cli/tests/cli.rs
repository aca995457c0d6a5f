// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! End-to-end tests for the `queryview` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ROWS: &str = r#"[
  {"a": 1, "b": 1, "name": "one-one"},
  {"a": 1, "b": 2, "name": "one-two"},
  {"a": 2, "b": 1, "name": "two-one"}
]"#;

fn fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("rows.json"), ROWS).unwrap();
    fs::create_dir(dir.path().join("config")).unwrap();
    dir
}

fn queryview(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("queryview").unwrap();
    cmd.env_remove("RUST_LOG")
        .arg("--config-dir")
        .arg(dir.join("config"));
    cmd
}

fn with_data(dir: &Path) -> Command {
    let mut cmd = queryview(dir);
    cmd.arg("--data").arg(dir.join("rows.json"));
    cmd
}

#[test]
fn count_without_filters() {
    let dir = fixture();
    with_data(dir.path())
        .arg("count")
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn filter_and_exclude_compose() {
    let dir = fixture();
    with_data(dir.path())
        .args(["-f", "a=1", "-x", "b=2", "list"])
        .assert()
        .success()
        .stdout("{\"a\":1,\"b\":1,\"name\":\"one-one\"}\n");
}

#[test]
fn membership_suffix_from_the_command_line() {
    let dir = fixture();
    with_data(dir.path())
        .args(["-x", "a__in=1", "first"])
        .assert()
        .success()
        .stdout(predicate::str::contains("two-one"));
}

#[test]
fn get_reports_ambiguous_and_not_found() {
    let dir = fixture();
    with_data(dir.path())
        .args(["--model", "Row", "get", "a=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("more than one Row -- it returned 2"));
    with_data(dir.path())
        .args(["--model", "Row", "get", "a=3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Row matching query does not exist"));
    with_data(dir.path())
        .args(["get", "a=2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("two-one"));
}

#[test]
fn empty_first_and_last_print_null() {
    let dir = fixture();
    for cmd in ["first", "last"] {
        with_data(dir.path())
            .args(["-f", "a=999", cmd])
            .assert()
            .success()
            .stdout("null\n");
    }
    with_data(dir.path())
        .args(["-f", "a=999", "exists"])
        .assert()
        .success()
        .stdout("false\n");
}

#[test]
fn missing_dataset_is_an_error() {
    let dir = fixture();
    queryview(dir.path())
        .arg("count")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no dataset"));
}

#[test]
fn unreadable_dataset_surfaces_source_error() {
    let dir = fixture();
    queryview(dir.path())
        .arg("--data")
        .arg(dir.path().join("missing.json"))
        .arg("count")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn saved_prefs_supply_defaults() {
    let dir = fixture();
    queryview(dir.path())
        .args(["prefs", "set", "--format", "table", "--model", "Row", "--data"])
        .arg(dir.path().join("rows.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"format\": \"table\""));
    assert!(dir.path().join("config/prefs.json").is_file());

    queryview(dir.path())
        .args(["-f", "b=1", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("one-one").and(predicate::str::contains("two-one")))
        .stdout(predicate::str::contains("{").not());

    queryview(dir.path())
        .args(["get", "a=7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Row matching query does not exist"));
}

#[test]
fn prefs_show_defaults() {
    let dir = fixture();
    queryview(dir.path())
        .args(["prefs", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"model\": \"record\""));
}
