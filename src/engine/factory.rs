// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

use crate::config::{Strategy, WorkflowConfig};
use crate::engine::level_by_level::{LevelByLevelExecutor, RetryPolicy};
use crate::traits::DagExecutor;

/// Factory for creating DAG executors from workflow configuration
pub struct ExecutorFactory;

impl ExecutorFactory {
    /// Create a DAG executor based on the workflow's strategy, retry and timeout settings
    pub fn from_workflow(workflow: &WorkflowConfig) -> Box<dyn DagExecutor> {
        Box::new(Self::level_executor(workflow))
    }

    fn level_executor(workflow: &WorkflowConfig) -> LevelByLevelExecutor {
        let executor = match (workflow.strategy, workflow.executor_options.max_concurrency) {
            (Strategy::Sequential, _) => LevelByLevelExecutor::new(1),
            (Strategy::Level, Some(max_concurrency)) => LevelByLevelExecutor::new(max_concurrency),
            (Strategy::Level, None) => LevelByLevelExecutor::with_default_concurrency(),
        };

        executor
            .with_retry(RetryPolicy {
                retries: workflow.retries,
                delay: workflow.retry_delay(),
            })
            .with_task_timeout(
                workflow
                    .executor_options
                    .timeout_seconds
                    .map(Duration::from_secs),
            )
    }
}
