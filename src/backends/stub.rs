// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Minimal task implementations for exercising the executor.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::engine::{TaskRequest, TaskResponse};
use crate::traits::Task;

/// A task that returns a fixed output and records which upstream outputs it could see.
pub struct StubTask {
    pub id: String,
    pub output: Value,
    pub seen_upstream: Arc<Mutex<Vec<String>>>,
}

impl StubTask {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            output: json!({ "from": id }),
            id,
            seen_upstream: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait::async_trait]
impl Task for StubTask {
    async fn run(&self, req: TaskRequest) -> TaskResponse {
        let mut seen: Vec<String> = req.outputs.keys().cloned().collect();
        seen.sort();
        if let Ok(mut guard) = self.seen_upstream.lock() {
            *guard = seen;
        }
        TaskResponse::output(&self.output)
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

/// A task that always fails and counts how often it was attempted.
pub struct FailingTask {
    pub id: String,
    pub attempts: Arc<AtomicU32>,
}

impl FailingTask {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attempts: Arc::new(AtomicU32::new(0)),
        }
    }
}

#[async_trait::async_trait]
impl Task for FailingTask {
    async fn run(&self, _req: TaskRequest) -> TaskResponse {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        TaskResponse::error(500, "Simulated task failure")
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Fails the first `failures` attempts, then succeeds.
pub struct FlakyTask {
    pub failures: u32,
    pub attempts: Arc<AtomicU32>,
}

impl FlakyTask {
    pub fn new(failures: u32) -> Self {
        Self {
            failures,
            attempts: Arc::new(AtomicU32::new(0)),
        }
    }
}

#[async_trait::async_trait]
impl Task for FlakyTask {
    async fn run(&self, _req: TaskRequest) -> TaskResponse {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures {
            TaskResponse::error(503, format!("transient failure #{}", attempt))
        } else {
            TaskResponse::output(&json!({ "attempt": attempt }))
        }
    }

    fn name(&self) -> &'static str {
        "flaky"
    }
}

/// Sleeps before answering; used for timeout tests.
pub struct SlowTask {
    pub delay: Duration,
}

#[async_trait::async_trait]
impl Task for SlowTask {
    async fn run(&self, _req: TaskRequest) -> TaskResponse {
        tokio::time::sleep(self.delay).await;
        TaskResponse::output(&json!("late"))
    }

    fn name(&self) -> &'static str {
        "slow"
    }
}

/// Reads a number from `upstream` and adds one.
pub struct IncrementTask {
    pub upstream: String,
}

#[async_trait::async_trait]
impl Task for IncrementTask {
    async fn run(&self, req: TaskRequest) -> TaskResponse {
        match req.pull::<i64>(&self.upstream) {
            Ok(n) => TaskResponse::output(&(n + 1)),
            Err(e) => e.into(),
        }
    }

    fn name(&self) -> &'static str {
        "increment"
    }
}
