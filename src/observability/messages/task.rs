// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for task execution: attempts, retries and timeouts.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Task produced an output.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct TaskCompleted<'a> {
    pub task_id: &'a str,
    pub attempt: u32,
    pub duration: Duration,
}

impl Display for TaskCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' completed on attempt {} in {:?}",
            self.task_id, self.attempt, self.duration
        )
    }
}

impl StructuredLog for TaskCompleted<'_> {
    fn log(&self) {
        tracing::debug!(
            task_id = self.task_id,
            attempt = self.attempt,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "task_completed",
            span_name = name,
            task_id = self.task_id,
            attempt = self.attempt,
        )
    }
}

/// One attempt failed; another attempt follows after `retry_in`.
///
/// # Log Level
/// `warn!` - Recoverable failure
///
/// # Example
/// ```
/// use alerta_flows::observability::messages::task::TaskAttemptFailed;
/// use std::time::Duration;
///
/// let msg = TaskAttemptFailed {
///     task_id: "actualizar_estado",
///     attempt: 1,
///     max_attempts: 3,
///     error: "connection refused",
///     retry_in: Duration::from_secs(120),
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Task 'actualizar_estado' attempt 1/3 failed: connection refused (retrying in 120s)"
/// );
/// ```
pub struct TaskAttemptFailed<'a> {
    pub task_id: &'a str,
    pub attempt: u32,
    pub max_attempts: u32,
    pub error: &'a str,
    pub retry_in: Duration,
}

impl Display for TaskAttemptFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' attempt {}/{} failed: {} (retrying in {:?})",
            self.task_id, self.attempt, self.max_attempts, self.error, self.retry_in
        )
    }
}

impl StructuredLog for TaskAttemptFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            task_id = self.task_id,
            attempt = self.attempt,
            max_attempts = self.max_attempts,
            error = self.error,
            retry_in_secs = self.retry_in.as_secs(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "task_attempt_failed",
            span_name = name,
            task_id = self.task_id,
            attempt = self.attempt,
        )
    }
}

/// Task exhausted its attempts.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct TaskFailed<'a> {
    pub task_id: &'a str,
    pub attempts: u32,
    pub error: &'a str,
}

impl Display for TaskFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' failed after {} attempt(s): {}",
            self.task_id, self.attempts, self.error
        )
    }
}

impl StructuredLog for TaskFailed<'_> {
    fn log(&self) {
        tracing::error!(
            task_id = self.task_id,
            attempts = self.attempts,
            error = self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "task_failed",
            span_name = name,
            task_id = self.task_id,
            attempts = self.attempts,
        )
    }
}

/// Formatted error text for an attempt that hit the per-task timeout.
pub struct TaskTimedOut<'a> {
    pub task_id: &'a str,
    pub timeout: Duration,
}

impl Display for TaskTimedOut<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Task '{}' timed out after {:?}",
            self.task_id, self.timeout
        )
    }
}

impl StructuredLog for TaskTimedOut<'_> {
    fn log(&self) {
        tracing::warn!(
            task_id = self.task_id,
            timeout_secs = self.timeout.as_secs(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("task_timed_out", span_name = name, task_id = self.task_id)
    }
}
