// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use jw_core::WorkerStatus;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Final state of one job
#[derive(Debug, Serialize)]
pub struct JobReport {
    pub id: String,
    pub command: String,
    pub args: Vec<String>,
    pub status: WorkerStatus,
    pub exit_code: Option<i32>,
    pub output: String,
}

impl fmt::Display for JobReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "==> {} [{}] {}", self.id, self.status, self.command)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        writeln!(f)?;
        write!(f, "{}", self.output)
    }
}

/// Print a list of items
pub fn print_list<T: Serialize + fmt::Display>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for item in items {
                println!("{}", item);
            }
        }
        OutputFormat::Json => {
            if let Ok(json) = serde_json::to_string_pretty(items) {
                println!("{}", json);
            }
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
