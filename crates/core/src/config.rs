// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker configuration

use std::path::{Path, PathBuf};

/// Environment variable overriding the log directory
pub const LOG_DIR_ENV: &str = "JW_LOG_DIR";

/// Default log directory, relative to the working directory
pub const DEFAULT_LOG_DIR: &str = "logs";

const LOG_FILE_PREFIX: &str = "worker_output_";

/// Where workers persist their combined output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerConfig {
    pub log_dir: PathBuf,
}

impl WorkerConfig {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    /// Load from the environment, falling back to [`DEFAULT_LOG_DIR`]
    pub fn from_env() -> Self {
        match std::env::var_os(LOG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::default(),
        }
    }

    /// Log file for the worker with the given id
    pub fn log_path(&self, id: &str) -> PathBuf {
        self.log_dir.join(format!("{LOG_FILE_PREFIX}{id}.log"))
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_DIR)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
