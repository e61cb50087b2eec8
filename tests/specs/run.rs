//! `jw run` specs

use crate::prelude::*;

#[test]
fn echo_output_is_printed_and_logs_removed() {
    let scratch = Scratch::new();
    scratch
        .jw()
        .args(["run", "--", "echo", "what is up"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[finished] echo what is up"))
        .stdout(predicate::str::contains("\nwhat is up\n"));
    assert_eq!(scratch.log_count(), 0);
}

#[test]
fn keep_logs_leaves_one_file_per_job() {
    let scratch = Scratch::new();
    scratch
        .jw()
        .args(["run", "--keep-logs", "-j", "echo one", "-j", "echo two"])
        .assert()
        .success();
    assert_eq!(scratch.log_count(), 2);
}

#[test]
fn failing_job_sets_exit_code() {
    let scratch = Scratch::new();
    scratch
        .jw()
        .args(["run", "-j", "true", "-j", "sh -c exit"])
        .assert()
        .success();

    scratch
        .jw()
        .args(["run", "-j", "true", "-j", "false"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] false"));
}

#[test]
fn missing_executable_reports_error_status() {
    let scratch = Scratch::new();
    scratch
        .jw()
        .args(["run", "--", "jw-no-such-binary"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error] jw-no-such-binary"));
}

#[test]
fn json_report_per_job() {
    let scratch = Scratch::new();
    let output = scratch
        .jw()
        .args(["run", "--format", "json", "-j", "echo hi", "-j", "false"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let reports = reports.as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["status"], "finished");
    assert_eq!(reports[0]["output"], "hi\n");
    assert_eq!(reports[0]["exit_code"], 0);
    assert_eq!(reports[1]["status"], "error");
    assert_eq!(reports[1]["exit_code"], 1);
}

#[test]
fn stderr_of_jobs_is_captured_in_report() {
    let scratch = Scratch::new();
    scratch
        .jw()
        .args(["run", "--", "sh", "-c", "echo oops >&2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("oops"));
}
