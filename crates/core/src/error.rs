// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for worker operations

use crate::status::WorkerStatus;
use std::path::PathBuf;
use thiserror::Error;

/// Errors creating a worker. No partial worker is returned.
#[derive(Debug, Error)]
pub enum ConstructionError {
    #[error("invalid worker id: {0:?}")]
    InvalidId(String),
    #[error("failed to create log directory {}: {source}", .path.display())]
    LogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to allocate log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors returned from `Worker::start`
#[derive(Debug, Error)]
pub enum StartError {
    #[error("worker already started (status: {0})")]
    AlreadyStarted(WorkerStatus),
    #[error("failed to open log file {}: {source}", .path.display())]
    LogOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed waiting for process: {0}")]
    Wait(#[source] std::io::Error),
    #[error("process exited unsuccessfully (code: {})", .code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    Exit { code: Option<i32> },
    #[error("process was killed")]
    Killed,
}

/// Errors returned from `Worker::stop`. Status is unchanged on error.
#[derive(Debug, Error)]
pub enum StopError {
    #[error("attempt to stop a worker that is not running (status: {0})")]
    NotRunning(WorkerStatus),
    #[error("worker has no process handle")]
    InvalidProcess,
    #[error("failed to deliver kill request: process already exited")]
    Signal,
}

/// Errors accessing the log file
#[derive(Debug, Error)]
pub enum LogError {
    #[error("logs unavailable while worker is {0}")]
    Unavailable(WorkerStatus),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
