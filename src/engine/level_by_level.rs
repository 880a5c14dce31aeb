// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

use crate::config::{DependencyGraph, EntryPoints, TaskMap};
use crate::engine::{Outcome, RunContext, RunReport, TaskRequest, TaskResponse};
use crate::errors::{ExecutionError, FailureStrategy};
use crate::observability::messages::engine::{
    ExecutionCompleted, ExecutionStarted, LevelComputationCompleted, TaskSkipped,
    TopologicalSortFailed,
};
use crate::observability::messages::task::{
    TaskAttemptFailed, TaskCompleted, TaskFailed, TaskTimedOut,
};
use crate::observability::messages::StructuredLog;
use crate::traits::executor::DagExecutor;
use crate::traits::Task;

/// Error code of a response built from a missing upstream output. Retrying
/// cannot help: the snapshot a task sees does not change between attempts.
const UNMET_DEPENDENCY_CODE: u16 = 424;

/// How often a failed task is re-attempted within one run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure.
    pub retries: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.retries + 1
    }
}

/// Level-by-Level executor that runs a workflow graph in topological levels.
///
/// ## Execution Strategy
///
/// 1. **Topological Level Computation**: Kahn's algorithm over the forward
///    graph, with a reverse dependency map for in-degrees
/// 2. **Level-by-Level Execution**: every task of a level is spawned at once,
///    bounded by a semaphore of `max_concurrency` permits
/// 3. **Output Exchange**: before a level starts, the outputs of every task
///    completed so far are frozen into a snapshot shared by that level's
///    requests, so tasks of the same level never observe each other
///
/// ## Failure Handling
///
/// Each task gets `retry.max_attempts()` attempts, `retry.delay` apart, and
/// each attempt may be bounded by `task_timeout`. What happens once a task is
/// out of attempts depends on the [`FailureStrategy`]:
///
/// - `FailFast`: the level is allowed to finish, then the run is aborted
/// - `ContinueOnError`: downstream tasks are skipped, independent ones still run
/// - `BestEffort`: downstream tasks run anyway and fail on their own if they
///   needed the missing output
pub struct LevelByLevelExecutor {
    /// Maximum number of concurrent task executions within a level
    max_concurrency: usize,
    retry: RetryPolicy,
    task_timeout: Option<Duration>,
}

impl LevelByLevelExecutor {
    /// Create a new Level-by-Level executor with the specified concurrency limit
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1),
            retry: RetryPolicy::default(),
            task_timeout: None,
        }
    }

    /// Concurrency equal to the number of CPU cores
    pub fn with_default_concurrency() -> Self {
        let concurrency = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::new(concurrency)
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_task_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.task_timeout = timeout;
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout
    }

    /// Compute topological levels with Kahn's algorithm.
    ///
    /// - Level 0: entry points (tasks with no dependencies)
    /// - Level N: tasks whose dependencies are all in levels 0..N-1
    ///
    /// Within a level, tasks keep the order in which their last dependency
    /// released them, so level 0 follows the entry point order.
    ///
    /// Cycles and graphs without entry points should be rejected by config
    /// validation; both are reported as `InternalError` if they slip through.
    fn compute_topological_levels(
        &self,
        graph: &DependencyGraph,
        entrypoints: &EntryPoints,
    ) -> Result<Vec<Vec<String>>, ExecutionError> {
        let mut levels = Vec::new();
        let mut queue = VecDeque::new();
        let mut processed = HashSet::new();

        // The graph stores task -> [dependents]; in-degrees need task -> [dependencies].
        let reverse_deps = graph.build_reverse_dependencies();

        let mut in_degree = HashMap::new();
        for (task_id, dependencies) in &reverse_deps {
            in_degree.insert(task_id.clone(), dependencies.len());
        }

        let mut current_level = Vec::new();
        for entry_id in &entrypoints.0 {
            if in_degree.get(entry_id).copied().unwrap_or(0) == 0 {
                current_level.push(entry_id.clone());
                queue.push_back(entry_id.clone());
                processed.insert(entry_id.clone());
            }
        }

        if current_level.is_empty() {
            return Err(ExecutionError::InternalError {
                message: "No valid entry points found - all tasks have dependencies".into(),
            });
        }

        levels.push(current_level);

        while !queue.is_empty() {
            let mut next_level = Vec::new();
            let current_level_size = queue.len();

            for _ in 0..current_level_size {
                if let Some(current_id) = queue.pop_front() {
                    if let Some(dependents) = graph.0.get(&current_id) {
                        for dependent_id in dependents {
                            if !processed.contains(dependent_id) {
                                let current_in_degree = in_degree.get_mut(dependent_id)
                                    .ok_or_else(|| ExecutionError::InternalError {
                                        message: format!("Internal consistency error: task '{}' not found in in-degree map during topological sorting", dependent_id)
                                    })?;
                                *current_in_degree -= 1;

                                if *current_in_degree == 0 {
                                    next_level.push(dependent_id.clone());
                                    processed.insert(dependent_id.clone());
                                }
                            }
                        }
                    }
                }
            }

            for task_id in &next_level {
                queue.push_back(task_id.clone());
            }

            if !next_level.is_empty() {
                levels.push(next_level);
            }
        }

        let mut total_tasks: HashSet<_> = graph.0.keys().cloned().collect();
        for entry_id in &entrypoints.0 {
            total_tasks.insert(entry_id.clone());
        }

        if processed.len() != total_tasks.len() {
            return Err(ExecutionError::InternalError {
                message: "Internal consistency error: dependency graph contains cycles (should have been caught during config validation)".into(),
            });
        }

        Ok(levels)
    }

    /// Run every task of one level concurrently and collect
    /// `(task_id, final response, attempts used)` in level order.
    async fn execute_level(
        &self,
        level_tasks: &[String],
        tasks: &TaskMap,
        run: &Arc<RunContext>,
        snapshot: &Arc<HashMap<String, Value>>,
    ) -> Result<Vec<(String, TaskResponse, u32)>, ExecutionError> {
        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.max_concurrency));
        let mut handles = Vec::new();

        for task_id in level_tasks {
            let task = tasks
                .get(task_id)
                .ok_or_else(|| ExecutionError::TaskNotFound(task_id.clone()))?
                .clone();

            let task_id_clone = task_id.clone();
            let request = TaskRequest::new(run.clone(), snapshot.clone());
            let semaphore_clone = semaphore.clone();
            let retry = self.retry;
            let timeout = self.task_timeout;

            let handle = tokio::spawn(async move {
                let _permit =
                    semaphore_clone
                        .acquire()
                        .await
                        .map_err(|e| ExecutionError::InternalError {
                            message: format!(
                                "Failed to acquire semaphore permit for task '{}': {}",
                                task_id_clone, e
                            ),
                        })?;

                let (response, attempts) =
                    Self::run_with_retry(&task_id_clone, task, request, retry, timeout).await;
                Ok::<_, ExecutionError>((task_id_clone, response, attempts))
            });

            handles.push(handle);
        }

        let mut completed = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(Ok(entry)) => completed.push(entry),
                Ok(Err(e)) => return Err(e),
                Err(join_error) => {
                    return Err(ExecutionError::InternalError {
                        message: format!("Task join error: {}", join_error),
                    });
                }
            }
        }

        Ok(completed)
    }

    async fn run_with_retry(
        task_id: &str,
        task: Arc<dyn Task>,
        request: TaskRequest,
        retry: RetryPolicy,
        timeout: Option<Duration>,
    ) -> (TaskResponse, u32) {
        let max_attempts = retry.max_attempts();
        let mut attempt = 1;

        loop {
            let started = Instant::now();
            let response = match timeout {
                Some(limit) => match tokio::time::timeout(limit, task.run(request.clone())).await {
                    Ok(response) => response,
                    Err(_) => {
                        let msg = TaskTimedOut {
                            task_id,
                            timeout: limit,
                        };
                        msg.log();
                        TaskResponse::error(504, msg.to_string())
                    }
                },
                None => task.run(request.clone()).await,
            };

            match &response.outcome {
                Outcome::Output(_) => {
                    TaskCompleted {
                        task_id,
                        attempt,
                        duration: started.elapsed(),
                    }
                    .log();
                    return (response, attempt);
                }
                Outcome::Error(detail) => {
                    if attempt >= max_attempts || detail.code == UNMET_DEPENDENCY_CODE {
                        TaskFailed {
                            task_id,
                            attempts: attempt,
                            error: &detail.message,
                        }
                        .log();
                        return (response, attempt);
                    }

                    TaskAttemptFailed {
                        task_id,
                        attempt,
                        max_attempts,
                        error: &detail.message,
                        retry_in: retry.delay,
                    }
                    .log();
                    tokio::time::sleep(retry.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[async_trait]
impl DagExecutor for LevelByLevelExecutor {
    async fn execute_with_strategy(
        &self,
        tasks: TaskMap,
        graph: DependencyGraph,
        entrypoints: EntryPoints,
        run: RunContext,
        failure_strategy: FailureStrategy,
    ) -> Result<RunReport, ExecutionError> {
        let started = Instant::now();

        let levels = match self.compute_topological_levels(&graph, &entrypoints) {
            Ok(levels) => levels,
            Err(e) => {
                TopologicalSortFailed {
                    reason: &e.to_string(),
                }
                .log();
                return Err(e);
            }
        };
        LevelComputationCompleted {
            level_count: levels.len(),
            task_count: tasks.len(),
        }
        .log();

        let start_msg = ExecutionStarted {
            workflow_id: &run.workflow_id,
            run_id: &run.run_id,
            strategy: self.strategy_name(),
            task_count: tasks.len(),
            max_concurrency: self.max_concurrency,
        };
        let span = start_msg.span("workflow_run");
        start_msg.log();

        let reverse_deps = graph.build_reverse_dependencies();
        let run = Arc::new(run);

        async move {
            let mut outputs: HashMap<String, Value> = HashMap::new();
            let mut results: HashMap<String, TaskResponse> = HashMap::new();
            let mut failed = Vec::new();
            let mut skipped = Vec::new();
            // Failed or skipped; dependents of these are skipped under ContinueOnError.
            let mut blocked: HashSet<String> = HashSet::new();

            for level_tasks in &levels {
                let mut runnable = Vec::with_capacity(level_tasks.len());
                for task_id in level_tasks {
                    let blocking_dep = reverse_deps
                        .get(task_id)
                        .and_then(|deps| deps.iter().find(|d| blocked.contains(*d)));

                    match (failure_strategy, blocking_dep) {
                        (FailureStrategy::ContinueOnError, Some(upstream)) => {
                            TaskSkipped { task_id, upstream }.log();
                            blocked.insert(task_id.clone());
                            skipped.push(task_id.clone());
                        }
                        _ => runnable.push(task_id.clone()),
                    }
                }

                let snapshot = Arc::new(outputs.clone());
                let completed = self
                    .execute_level(&runnable, &tasks, &run, &snapshot)
                    .await?;

                let mut first_failure = None;
                for (task_id, response, attempts) in completed {
                    match &response.outcome {
                        Outcome::Output(value) => {
                            outputs.insert(task_id.clone(), value.clone());
                        }
                        Outcome::Error(detail) => {
                            if first_failure.is_none() {
                                first_failure = Some(ExecutionError::TaskFailed {
                                    task_id: task_id.clone(),
                                    attempts,
                                    error: detail.message.clone(),
                                });
                            }
                            blocked.insert(task_id.clone());
                            failed.push(task_id.clone());
                        }
                    }
                    results.insert(task_id, response);
                }

                if let (FailureStrategy::FailFast, Some(error)) = (failure_strategy, first_failure)
                {
                    return Err(error);
                }
            }

            let duration = started.elapsed();
            ExecutionCompleted {
                workflow_id: &run.workflow_id,
                run_id: &run.run_id,
                succeeded: outputs.len(),
                failed: failed.len(),
                skipped: skipped.len(),
                duration,
            }
            .log();

            Ok(RunReport {
                run: (*run).clone(),
                results,
                failed,
                skipped,
                duration,
            })
        }
        .instrument(span)
        .await
    }

    fn strategy_name(&self) -> &'static str {
        if self.max_concurrency == 1 {
            "sequential"
        } else {
            "level_by_level"
        }
    }
}
