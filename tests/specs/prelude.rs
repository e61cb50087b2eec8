//! Shared helpers for CLI specs

#![allow(dead_code)]

pub use predicates::prelude::*;

use assert_cmd::Command;
use std::path::Path;
use tempfile::TempDir;

/// Scratch log directory for one spec
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// `jw` with logs directed into this scratch directory
    pub fn jw(&self) -> Command {
        let mut cmd = Command::cargo_bin("jw").unwrap();
        cmd.env("JW_LOG_DIR", self.path()).env_remove("RUST_LOG");
        cmd
    }

    pub fn log_count(&self) -> usize {
        std::fs::read_dir(self.path()).unwrap().count()
    }
}
