// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur during workflow graph validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A circular dependency was detected in the task graph
    CyclicDependency {
        /// The workflow containing the cycle
        workflow_id: String,
        /// The cycle path showing the circular dependency
        cycle: Vec<String>,
    },
    /// A task references a dependency that doesn't exist
    UnresolvedDependency {
        workflow_id: String,
        /// The task that has the unresolved dependency
        task_id: String,
        /// The dependency that couldn't be resolved
        missing_dependency: String,
    },
    /// Two tasks in the same workflow share an ID
    DuplicateTaskId { workflow_id: String, task_id: String },
    /// Two workflows share an ID
    DuplicateWorkflowId { workflow_id: String },
    /// A task names an implementation the task factory does not provide
    UnknownTask {
        workflow_id: String,
        task_id: String,
        task: String,
    },
    /// A task pulls the output of a task that is not among its dependencies
    UnreachableInput {
        workflow_id: String,
        task_id: String,
        /// The option (or its default) naming the upstream task
        option: String,
        input: String,
    },
    /// A task option has a value the task cannot use
    InvalidTaskOption {
        workflow_id: String,
        task_id: String,
        reason: String,
    },
    /// A workflow would run in a tight loop
    ZeroScheduleInterval { workflow_id: String },
    /// A workflow declares no tasks
    EmptyWorkflow { workflow_id: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::CyclicDependency { workflow_id, cycle } => {
                write!(
                    f,
                    "Workflow '{}': cyclic dependency detected: {}",
                    workflow_id,
                    cycle.join(" -> ")
                )
            }
            ValidationError::UnresolvedDependency {
                workflow_id,
                task_id,
                missing_dependency,
            } => {
                write!(
                    f,
                    "Workflow '{}': task '{}' depends on '{}' which does not exist",
                    workflow_id, task_id, missing_dependency
                )
            }
            ValidationError::DuplicateTaskId {
                workflow_id,
                task_id,
            } => {
                write!(f, "Workflow '{}': duplicate task ID '{}'", workflow_id, task_id)
            }
            ValidationError::DuplicateWorkflowId { workflow_id } => {
                write!(f, "Duplicate workflow ID: '{}'", workflow_id)
            }
            ValidationError::UnknownTask {
                workflow_id,
                task_id,
                task,
            } => {
                write!(
                    f,
                    "Workflow '{}': task '{}' uses unknown implementation '{}'",
                    workflow_id, task_id, task
                )
            }
            ValidationError::UnreachableInput {
                workflow_id,
                task_id,
                option,
                input,
            } => {
                write!(
                    f,
                    "Workflow '{}': task '{}' reads '{}' through '{}', which is not one of its dependencies",
                    workflow_id, task_id, input, option
                )
            }
            ValidationError::InvalidTaskOption {
                workflow_id,
                task_id: _,
                reason,
            } => {
                write!(f, "Workflow '{}': {}", workflow_id, reason)
            }
            ValidationError::ZeroScheduleInterval { workflow_id } => {
                write!(
                    f,
                    "Workflow '{}': schedule_interval_secs must be greater than zero",
                    workflow_id
                )
            }
            ValidationError::EmptyWorkflow { workflow_id } => {
                write!(f, "Workflow '{}' has no tasks", workflow_id)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading configuration from disk.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("configuration validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),

    #[error("workflow '{0}' is not configured")]
    UnknownWorkflow(String),

    #[error("failed to create task '{task_id}': {reason}")]
    TaskCreation { task_id: String, reason: String },

    #[error("failed to initialise {service}: {reason}")]
    Service {
        service: &'static str,
        reason: String,
    },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
