// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use crate::engine::{TaskRequest, TaskResponse};
use crate::model::{Assignment, Status, UpdateSummary};
use crate::observability::messages::incidents::{BatchCompleted, StatusUpdateFailed};
use crate::observability::messages::StructuredLog;
use crate::traits::{IncidentApi, Task};

/// Moves every assigned incident to `en_atencion` through the REST API.
///
/// Individual failures are logged and counted; they never fail the task.
pub struct UpdateStatusTask {
    input: String,
    api: Arc<dyn IncidentApi>,
}

impl UpdateStatusTask {
    pub fn new(input: impl Into<String>, api: Arc<dyn IncidentApi>) -> Self {
        Self {
            input: input.into(),
            api,
        }
    }
}

#[async_trait]
impl Task for UpdateStatusTask {
    async fn run(&self, req: TaskRequest) -> TaskResponse {
        let assignments: Vec<Assignment> = match req.pull(&self.input) {
            Ok(assignments) => assignments,
            Err(e) => return e.into(),
        };

        let mut summary = UpdateSummary {
            updated: 0,
            total: assignments.len(),
        };

        for assignment in &assignments {
            match self
                .api
                .update_status(&assignment.incident_id, Status::InProgress)
                .await
            {
                Ok(()) => summary.updated += 1,
                Err(e) => StatusUpdateFailed {
                    incident_id: &assignment.incident_id,
                    error: &e,
                }
                .log(),
            }
        }

        BatchCompleted {
            action: "status updates",
            succeeded: summary.updated,
            total: summary.total,
        }
        .log();

        TaskResponse::output(&summary)
    }

    fn name(&self) -> &'static str {
        "update_status"
    }
}
