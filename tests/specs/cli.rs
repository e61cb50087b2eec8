//! CLI surface specs

use crate::prelude::*;

#[test]
fn help_lists_run() {
    Scratch::new()
        .jw()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"));
}

#[test]
fn run_without_jobs_fails() {
    Scratch::new()
        .jw()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no jobs given"));
}
