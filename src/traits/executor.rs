// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::config::{DependencyGraph, EntryPoints, TaskMap};
use crate::engine::{RunContext, RunReport};
use crate::errors::{ExecutionError, FailureStrategy};

#[async_trait]
pub trait DagExecutor: Send + Sync {
    /// Execute a workflow run given its tasks and their dependency graph.
    ///
    /// - `tasks`: registry mapping id -> task instance
    /// - `graph`: adjacency list (id -> list of dependents)
    /// - `entrypoints`: tasks with no dependencies
    /// - `run`: run identity and logical time shared by every task
    ///
    /// Uses [`FailureStrategy::FailFast`].
    async fn execute(
        &self,
        tasks: TaskMap,
        graph: DependencyGraph,
        entrypoints: EntryPoints,
        run: RunContext,
    ) -> Result<RunReport, ExecutionError> {
        self.execute_with_strategy(tasks, graph, entrypoints, run, FailureStrategy::default())
            .await
    }

    /// Execute with a specific failure handling strategy
    async fn execute_with_strategy(
        &self,
        tasks: TaskMap,
        graph: DependencyGraph,
        entrypoints: EntryPoints,
        run: RunContext,
        failure_strategy: FailureStrategy,
    ) -> Result<RunReport, ExecutionError>;

    /// Strategy name used in log output.
    fn strategy_name(&self) -> &'static str;
}
