// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory worker registry

use crate::id::WorkerId;
use crate::worker::Worker;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry of workers keyed by worker id.
///
/// Workers are shared: the creator may keep its own `Arc` alongside the
/// registry's. Entries live as long as the service.
#[derive(Debug, Default)]
pub struct Service {
    workers: RwLock<HashMap<WorkerId, Arc<Worker>>>,
}

impl Service {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a worker under its id, replacing any previous entry
    pub fn add_worker(&self, worker: Arc<Worker>) {
        let id = worker.worker_id().clone();
        let previous = self
            .workers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.clone(), worker);
        if previous.is_some() {
            tracing::warn!(worker_id = %id, "replaced registered worker");
        } else {
            tracing::debug!(worker_id = %id, "worker registered");
        }
    }

    pub fn get_worker(&self, id: &str) -> Option<Arc<Worker>> {
        self.workers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    /// Registered ids, sorted
    pub fn worker_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self
            .workers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .map(WorkerId::to_string)
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.workers.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
