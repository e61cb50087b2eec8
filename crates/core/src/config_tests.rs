// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn default_uses_logs_dir() {
    let config = WorkerConfig::default();
    assert_eq!(config.log_dir(), Path::new("logs"));
}

#[test]
fn log_path_embeds_worker_id() {
    let config = WorkerConfig::new("/var/tmp/jw");
    assert_eq!(
        config.log_path("abc-123"),
        PathBuf::from("/var/tmp/jw/worker_output_abc-123.log")
    );
}

#[test]
fn log_paths_differ_per_worker() {
    let config = WorkerConfig::default();
    assert_ne!(config.log_path("a"), config.log_path("b"));
}
