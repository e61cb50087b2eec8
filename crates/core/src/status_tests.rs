// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const ALL: [WorkerStatus; 6] = [
    WorkerStatus::Pending,
    WorkerStatus::Started,
    WorkerStatus::Running,
    WorkerStatus::Finished,
    WorkerStatus::Error,
    WorkerStatus::Killed,
];

#[test]
fn happy_path_is_allowed() {
    assert!(WorkerStatus::Pending.can_transition_to(WorkerStatus::Started));
    assert!(WorkerStatus::Started.can_transition_to(WorkerStatus::Running));
    assert!(WorkerStatus::Running.can_transition_to(WorkerStatus::Finished));
}

#[test]
fn stop_is_allowed_before_running_is_observed() {
    assert!(WorkerStatus::Started.can_transition_to(WorkerStatus::Killed));
    assert!(WorkerStatus::Running.can_transition_to(WorkerStatus::Killed));
}

#[test]
fn spawn_failure_goes_from_started_to_error() {
    assert!(WorkerStatus::Started.can_transition_to(WorkerStatus::Error));
}

#[test]
fn intermediate_states_cannot_be_skipped() {
    assert!(!WorkerStatus::Pending.can_transition_to(WorkerStatus::Running));
    assert!(!WorkerStatus::Pending.can_transition_to(WorkerStatus::Finished));
    assert!(!WorkerStatus::Started.can_transition_to(WorkerStatus::Finished));
}

#[test]
fn terminal_states_are_sticky() {
    for from in ALL.iter().copied().filter(|s| s.is_terminal()) {
        for to in ALL {
            assert!(
                !from.can_transition_to(to),
                "{from} must not transition to {to}"
            );
        }
    }
}

#[test]
fn killed_is_never_overwritten_by_completion() {
    assert!(!WorkerStatus::Killed.can_transition_to(WorkerStatus::Finished));
    assert!(!WorkerStatus::Killed.can_transition_to(WorkerStatus::Error));
}

#[test]
fn terminal_set() {
    let terminal: Vec<_> = ALL.into_iter().filter(|s| s.is_terminal()).collect();
    assert_eq!(
        terminal,
        vec![
            WorkerStatus::Finished,
            WorkerStatus::Error,
            WorkerStatus::Killed
        ]
    );
}

#[test]
fn displays_and_serializes_lowercase() {
    assert_eq!(WorkerStatus::Running.to_string(), "running");
    assert_eq!(
        serde_json::to_string(&WorkerStatus::Killed).unwrap(),
        "\"killed\""
    );
    let parsed: WorkerStatus = serde_json::from_str("\"finished\"").unwrap();
    assert_eq!(parsed, WorkerStatus::Finished);
}
