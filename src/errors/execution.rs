// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;

/// How a run reacts when a task fails after exhausting its retries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    /// Abort the run at the first failed task.
    #[default]
    FailFast,
    /// Skip every task downstream of a failure; independent branches still run.
    ContinueOnError,
    /// Run every task regardless; tasks missing upstream output fail on their own.
    BestEffort,
}

/// Errors that abort a workflow run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecutionError {
    #[error("task '{0}' is not registered")]
    TaskNotFound(String),

    #[error("task '{task_id}' failed after {attempts} attempt(s): {error}")]
    TaskFailed {
        task_id: String,
        attempts: u32,
        error: String,
    },

    #[error("internal executor error: {message}")]
    InternalError { message: String },
}

/// Errors a task raises while reading the output of an upstream task.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PullError {
    #[error("no output available from task '{0}'")]
    Missing(String),

    #[error("output of task '{task_id}' has an unexpected shape: {reason}")]
    Malformed { task_id: String, reason: String },
}
