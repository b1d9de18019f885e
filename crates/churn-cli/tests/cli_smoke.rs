//! CLI binary smoke tests using assert_cmd.
//!
//! These exercise argument handling of the compiled `churn` binary. The full
//! model comparison is covered by the library's end-to-end tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("churn").unwrap()
}

#[test]
fn help_flag() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("churn"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("churn"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unexpected_argument_is_rejected() {
    cmd()
        .arg("customers.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}

#[test]
fn unknown_flag_is_rejected() {
    cmd()
        .arg("--seed")
        .arg("7")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
#[ignore = "trains all five models on 5000 rows"]
fn full_run_prints_report() {
    cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Dataset created with 5000 samples"))
        .stdout(predicate::str::contains("SUMMARY - MODEL PERFORMANCE COMPARISON"))
        .stdout(predicate::str::contains("FEATURE IMPORTANCE (Random Forest)"))
        .stdout(predicate::str::contains("Training completed successfully!"));
}
