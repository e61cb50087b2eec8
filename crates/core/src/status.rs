// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker status state machine
//!
//! ```text
//! pending -> started -> running -> finished
//!               |          |-----> error
//!               |          '-----> killed
//!               '-> error | killed
//! ```
//!
//! `finished`, `error` and `killed` are terminal. Every status write goes
//! through [`WorkerStatus::can_transition_to`], so a terminal status is never
//! overwritten. In particular a `killed` set by `stop()` wins over the
//! completion update racing in from the execution task.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Execution status of a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    /// Constructed, `start()` not yet called
    Pending,
    /// `start()` called, process not yet spawned
    Started,
    /// Process spawned and producing output
    Running,
    /// Process exited with code 0
    Finished,
    /// Spawn failed or process exited unsuccessfully
    Error,
    /// Forcefully terminated by `stop()`
    Killed,
}

impl WorkerStatus {
    /// No transition leaves a terminal status
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Error | Self::Killed)
    }

    pub fn is_running(self) -> bool {
        self == Self::Running
    }

    /// Whether `self -> next` is an edge of the state machine
    pub fn can_transition_to(self, next: WorkerStatus) -> bool {
        use WorkerStatus::*;
        matches!(
            (self, next),
            (Pending, Started)
                | (Started, Running | Error | Killed)
                | (Running, Finished | Error | Killed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Started => "started",
            Self::Running => "running",
            Self::Finished => "finished",
            Self::Error => "error",
            Self::Killed => "killed",
        }
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
