// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for workflow run lifecycle and scheduler events.
//!
//! This module contains message types for logging events related to:
//! * Run start, completion and failure
//! * Topological level computation
//! * Tasks skipped because an upstream task failed
//! * Scheduler start, ticks and shutdown

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Workflow run started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use alerta_flows::observability::messages::engine::ExecutionStarted;
///
/// let msg = ExecutionStarted {
///     workflow_id: "enviar_notificaciones",
///     run_id: "run-1",
///     strategy: "level_by_level",
///     task_count: 5,
///     max_concurrency: 4,
/// };
///
/// assert!(msg.to_string().contains("5 tasks"));
/// ```
pub struct ExecutionStarted<'a> {
    pub workflow_id: &'a str,
    pub run_id: &'a str,
    pub strategy: &'a str,
    pub task_count: usize,
    pub max_concurrency: usize,
}

impl Display for ExecutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting workflow '{}' with {} strategy: {} tasks, max_concurrency={}",
            self.workflow_id, self.strategy, self.task_count, self.max_concurrency
        )
    }
}

impl StructuredLog for ExecutionStarted<'_> {
    fn log(&self) {
        tracing::info!(
            workflow_id = self.workflow_id,
            run_id = self.run_id,
            strategy = self.strategy,
            task_count = self.task_count,
            max_concurrency = self.max_concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "workflow_run",
            span_name = name,
            workflow_id = self.workflow_id,
            run_id = self.run_id,
            strategy = self.strategy,
        )
    }
}

/// Workflow run finished. Failed and skipped tasks are only non-zero under
/// the lenient failure strategies.
///
/// # Log Level
/// `info!` when every task succeeded, `warn!` otherwise
pub struct ExecutionCompleted<'a> {
    pub workflow_id: &'a str,
    pub run_id: &'a str,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration: Duration,
}

impl Display for ExecutionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Workflow '{}' finished in {:?}: {} succeeded, {} failed, {} skipped",
            self.workflow_id, self.duration, self.succeeded, self.failed, self.skipped
        )
    }
}

impl StructuredLog for ExecutionCompleted<'_> {
    fn log(&self) {
        if self.failed == 0 && self.skipped == 0 {
            tracing::info!(
                workflow_id = self.workflow_id,
                run_id = self.run_id,
                succeeded = self.succeeded,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            );
        } else {
            tracing::warn!(
                workflow_id = self.workflow_id,
                run_id = self.run_id,
                succeeded = self.succeeded,
                failed = self.failed,
                skipped = self.skipped,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            );
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "workflow_run_completed",
            span_name = name,
            workflow_id = self.workflow_id,
            run_id = self.run_id,
            duration = ?self.duration,
        )
    }
}

/// Workflow run aborted.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ExecutionFailed<'a> {
    pub workflow_id: &'a str,
    pub run_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ExecutionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Workflow '{}' failed: {}", self.workflow_id, self.error)
    }
}

impl StructuredLog for ExecutionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            workflow_id = self.workflow_id,
            run_id = self.run_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "workflow_run_failed",
            span_name = name,
            workflow_id = self.workflow_id,
            error = %self.error,
        )
    }
}

/// Level computation completed for the level-by-level executor.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct LevelComputationCompleted {
    pub level_count: usize,
    pub task_count: usize,
}

impl Display for LevelComputationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Computed {} levels for {} tasks",
            self.level_count, self.task_count
        )
    }
}

impl StructuredLog for LevelComputationCompleted {
    fn log(&self) {
        tracing::debug!(
            level_count = self.level_count,
            task_count = self.task_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "level_computation",
            span_name = name,
            level_count = self.level_count,
            task_count = self.task_count,
        )
    }
}

/// Topological sort failed (cycle or no entry points).
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct TopologicalSortFailed<'a> {
    pub reason: &'a str,
}

impl Display for TopologicalSortFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Topological sort failed: {}", self.reason)
    }
}

impl StructuredLog for TopologicalSortFailed<'_> {
    fn log(&self) {
        tracing::error!(reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "topological_sort_failed",
            span_name = name,
            reason = self.reason,
        )
    }
}

/// A task was not run because one of its upstream tasks failed or was skipped.
///
/// # Log Level
/// `warn!` - Degraded run
pub struct TaskSkipped<'a> {
    pub task_id: &'a str,
    pub upstream: &'a str,
}

impl Display for TaskSkipped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Skipping task '{}': upstream task '{}' did not succeed",
            self.task_id, self.upstream
        )
    }
}

impl StructuredLog for TaskSkipped<'_> {
    fn log(&self) {
        tracing::warn!(task_id = self.task_id, upstream = self.upstream, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "task_skipped",
            span_name = name,
            task_id = self.task_id,
            upstream = self.upstream,
        )
    }
}

/// Scheduler started its loops.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SchedulerStarted {
    pub workflow_count: usize,
}

impl Display for SchedulerStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Scheduler started for {} workflows", self.workflow_count)
    }
}

impl StructuredLog for SchedulerStarted {
    fn log(&self) {
        tracing::info!(workflow_count = self.workflow_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "scheduler",
            span_name = name,
            workflow_count = self.workflow_count,
        )
    }
}

/// A workflow was registered with the scheduler.
///
/// # Log Level
/// `info!` - Important operational event
pub struct WorkflowScheduled<'a> {
    pub workflow_id: &'a str,
    pub interval: Duration,
}

impl Display for WorkflowScheduled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Workflow '{}' scheduled every {:?}",
            self.workflow_id, self.interval
        )
    }
}

impl StructuredLog for WorkflowScheduled<'_> {
    fn log(&self) {
        tracing::info!(
            workflow_id = self.workflow_id,
            interval_secs = self.interval.as_secs(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "workflow_schedule",
            span_name = name,
            workflow_id = self.workflow_id,
            interval_secs = self.interval.as_secs(),
        )
    }
}

/// Scheduler loops have exited.
///
/// # Log Level
/// `info!` - Important operational event
pub struct SchedulerStopped {
    pub runs_completed: u64,
}

impl Display for SchedulerStopped {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Scheduler stopped after {} runs",
            self.runs_completed
        )
    }
}

impl StructuredLog for SchedulerStopped {
    fn log(&self) {
        tracing::info!(runs_completed = self.runs_completed, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "scheduler_stopped",
            span_name = name,
            runs_completed = self.runs_completed,
        )
    }
}
