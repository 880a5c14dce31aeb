// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration validation.

use crate::errors::ValidationError;
use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Validation pass started.
///
/// # Log Level
/// `debug!` - Diagnostic information
pub struct ValidationStarted {
    pub workflow_count: usize,
}

impl Display for ValidationStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Validating configuration: {} workflows",
            self.workflow_count
        )
    }
}

impl StructuredLog for ValidationStarted {
    fn log(&self) {
        tracing::debug!(workflow_count = self.workflow_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "validation",
            span_name = name,
            workflow_count = self.workflow_count,
        )
    }
}

/// Validation pass completed without errors.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ValidationCompleted {
    pub workflow_count: usize,
}

impl Display for ValidationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration valid: {} workflows",
            self.workflow_count
        )
    }
}

impl StructuredLog for ValidationCompleted {
    fn log(&self) {
        tracing::info!(workflow_count = self.workflow_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "validation_completed",
            span_name = name,
            workflow_count = self.workflow_count,
        )
    }
}

/// A single validation problem.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use alerta_flows::errors::ValidationError;
/// use alerta_flows::observability::messages::validation::ValidationIssue;
///
/// let error = ValidationError::EmptyWorkflow { workflow_id: "vacio".into() };
/// let msg = ValidationIssue { error: &error };
///
/// assert_eq!(msg.to_string(), "Validation error: Workflow 'vacio' has no tasks");
/// ```
pub struct ValidationIssue<'a> {
    pub error: &'a ValidationError,
}

impl Display for ValidationIssue<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Validation error: {}", self.error)
    }
}

impl StructuredLog for ValidationIssue<'_> {
    fn log(&self) {
        tracing::error!(error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!("validation_issue", span_name = name, error = %self.error)
    }
}

/// Validation pass finished with errors.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ValidationFailed {
    pub error_count: usize,
}

impl Display for ValidationFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration validation failed with {} errors",
            self.error_count
        )
    }
}

impl StructuredLog for ValidationFailed {
    fn log(&self) {
        tracing::error!(error_count = self.error_count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "validation_failed",
            span_name = name,
            error_count = self.error_count,
        )
    }
}
