// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jw-core: supervision of externally spawned processes
//!
//! This crate provides:
//! - [`Worker`]: owns one OS process, its status and its output log
//! - [`Service`]: in-memory registry of workers keyed by id
//! - The [`WorkerStatus`] state machine shared by both

pub mod config;
pub mod error;
pub mod id;
pub mod service;
pub mod status;
pub mod worker;

pub use config::WorkerConfig;
pub use error::{ConstructionError, LogError, StartError, StopError};
pub use id::{IdGen, SequentialIdGen, UuidIdGen, WorkerId};
pub use service::Service;
pub use status::WorkerStatus;
pub use worker::Worker;
