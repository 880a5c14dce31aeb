// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Request/response envelopes passed between the executor and tasks.
//!
//! Each completed task publishes one JSON output. Downstream tasks read those
//! outputs by task ID with [`TaskRequest::pull`], which replaces passing
//! payloads along edges: a task may read any task that finished earlier in the
//! same run, not only its direct dependencies.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::PullError;

/// Identity and logical time of one workflow run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunContext {
    pub workflow_id: String,
    pub run_id: String,
    /// "Now" for every task in the run; time thresholds compare against this.
    pub logical_time: DateTime<Utc>,
}

impl RunContext {
    pub fn new(workflow_id: impl Into<String>, logical_time: DateTime<Utc>) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            run_id: uuid::Uuid::new_v4().to_string(),
            logical_time,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskRequest {
    pub run: Arc<RunContext>,
    /// Snapshot of outputs from tasks that completed before this one started.
    pub outputs: Arc<HashMap<String, Value>>,
}

impl TaskRequest {
    pub fn new(run: Arc<RunContext>, outputs: Arc<HashMap<String, Value>>) -> Self {
        Self { run, outputs }
    }

    /// Deserialize the output published by `task_id`.
    pub fn pull<T: DeserializeOwned>(&self, task_id: &str) -> Result<T, PullError> {
        let value = self
            .outputs
            .get(task_id)
            .ok_or_else(|| PullError::Missing(task_id.to_string()))?;
        T::deserialize(value).map_err(|e| PullError::Malformed {
            task_id: task_id.to_string(),
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetail {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Output(Value),
    Error(ErrorDetail),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskResponse {
    pub outcome: Outcome,
}

impl TaskResponse {
    pub fn output<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => Self {
                outcome: Outcome::Output(json),
            },
            Err(e) => Self::error(500, format!("Failed to serialize task output: {}", e)),
        }
    }

    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self {
            outcome: Outcome::Error(ErrorDetail {
                code,
                message: message.into(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Output(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Output(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }
}

impl From<PullError> for TaskResponse {
    fn from(err: PullError) -> Self {
        TaskResponse::error(424, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(outputs: HashMap<String, Value>) -> TaskRequest {
        TaskRequest::new(
            Arc::new(RunContext::new("wf", Utc::now())),
            Arc::new(outputs),
        )
    }

    #[test]
    fn test_pull_typed_output() {
        let req = request(HashMap::from([("count".to_string(), json!(3))]));
        let value: usize = req.pull("count").unwrap();
        assert_eq!(value, 3);
    }

    #[test]
    fn test_pull_missing_and_malformed() {
        let req = request(HashMap::from([("count".to_string(), json!("three"))]));

        assert_eq!(
            req.pull::<usize>("absent").unwrap_err(),
            PullError::Missing("absent".to_string())
        );
        assert!(matches!(
            req.pull::<usize>("count").unwrap_err(),
            PullError::Malformed { .. }
        ));
    }

    #[test]
    fn test_pull_error_converts_to_failed_response() {
        let response: TaskResponse = PullError::Missing("x".into()).into();
        assert!(!response.is_success());
        assert!(matches!(response.outcome, Outcome::Error(ErrorDetail { code: 424, .. })));
    }
}
