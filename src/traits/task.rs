// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::engine::{TaskRequest, TaskResponse};

/// A single node of a workflow graph.
///
/// Tasks never return `Err`: failures are reported as an error outcome so the
/// executor can apply retries and the run's failure strategy uniformly.
#[async_trait]
pub trait Task: Send + Sync {
    async fn run(&self, req: TaskRequest) -> TaskResponse;

    /// Implementation name, as referenced by `task:` in configuration.
    fn name(&self) -> &'static str;
}
