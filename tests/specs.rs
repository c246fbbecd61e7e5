// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Behavioral specifications for the grove CLI.
//!
//! These tests are black-box: they invoke the CLI binary and verify
//! stdout, stderr, and exit codes.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

use prelude::*;

#[test]
fn help_exits_successfully() {
    grove_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("grove"));
}

#[test]
fn version_exits_successfully() {
    grove_cmd().arg("--version").assert().success();
}

#[test]
fn run_without_a_command_is_a_usage_error() {
    grove_cmd().arg("run").assert().failure().code(2);
}

#[test]
fn run_passes_through_a_successful_suite() {
    let dir = tempfile::tempdir().unwrap();
    grove_cmd()
        .current_dir(dir.path())
        .args(["run", "--", "true"])
        .assert()
        .success();
}

#[test]
fn run_passes_through_a_failing_suite() {
    let dir = tempfile::tempdir().unwrap();
    grove_cmd()
        .current_dir(dir.path())
        .args(["run", "--", "false"])
        .assert()
        .failure();
}

#[test]
fn run_exports_settings_to_the_suite() {
    let dir = tempfile::tempdir().unwrap();
    grove_cmd()
        .current_dir(dir.path())
        .args(["run", "--seed", "7", "--focus", "Stack", "--"])
        .args(["sh", "-c", r#"test "$GROVE_SEED" = 7 && test "$GROVE_FOCUS" = Stack"#])
        .assert()
        .success();
}

#[test]
fn run_reads_grove_toml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("grove.toml"), "random_seed = 42\n").unwrap();
    grove_cmd()
        .current_dir(dir.path())
        .args(["run", "--", "sh", "-c", r#"test "$GROVE_SEED" = 42"#])
        .assert()
        .success();
}

#[test]
fn run_rejects_an_invalid_focus_regex() {
    let dir = tempfile::tempdir().unwrap();
    grove_cmd()
        .current_dir(dir.path())
        .args(["run", "--focus", "(", "--", "true"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("focus"));
}

#[test]
fn parallel_run_fails_when_workers_never_report() {
    let dir = tempfile::tempdir().unwrap();
    grove_cmd()
        .current_dir(dir.path())
        .args(["run", "--nodes", "2", "--", "true"])
        .assert()
        .failure();
}

#[test]
fn parallel_workers_receive_node_numbers_and_host() {
    let dir = tempfile::tempdir().unwrap();
    grove_cmd()
        .current_dir(dir.path())
        .args(["run", "--nodes", "2", "--", "sh", "-c"])
        .arg(r#"echo "$GROVE_PARALLEL_TOTAL $GROVE_PARALLEL_HOST" > "node$GROVE_PARALLEL_NODE.txt""#)
        .assert()
        .failure();

    for node in 1..=2 {
        let seen = std::fs::read_to_string(dir.path().join(format!("node{node}.txt"))).unwrap();
        assert!(seen.starts_with("2 http://127.0.0.1:"), "node {node} saw {seen}");
    }
}

#[test]
fn partition_prints_each_worker_slice() {
    grove_cmd()
        .args(["partition", "--specs", "13", "--nodes", "3"])
        .assert()
        .success()
        .stdout(
            predicates::str::contains("node 1: 0..4 (4 specs)")
                .and(predicates::str::contains("node 2: 4..8 (4 specs)"))
                .and(predicates::str::contains("node 3: 8..13 (5 specs)")),
        );
}

#[test]
fn partition_rejects_zero_nodes() {
    grove_cmd()
        .args(["partition", "--specs", "4", "--nodes", "0"])
        .assert()
        .failure();
}
