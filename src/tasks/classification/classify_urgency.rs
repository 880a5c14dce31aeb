// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::engine::{TaskRequest, TaskResponse};
use crate::model::{Incident, UrgencyBuckets};
use crate::observability::messages::incidents::UrgencyClassified;
use crate::observability::messages::StructuredLog;
use crate::traits::Task;

/// Buckets fetched incidents into `alta`/`media`/`baja`.
pub struct ClassifyUrgencyTask {
    input: String,
}

impl ClassifyUrgencyTask {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

#[async_trait]
impl Task for ClassifyUrgencyTask {
    async fn run(&self, req: TaskRequest) -> TaskResponse {
        let incidents: Vec<Incident> = match req.pull(&self.input) {
            Ok(incidents) => incidents,
            Err(e) => return e.into(),
        };

        let buckets = UrgencyBuckets::from_incidents(incidents);

        UrgencyClassified {
            high: buckets.high.len(),
            medium: buckets.medium.len(),
            low: buckets.low.len(),
        }
        .log();

        TaskResponse::output(&buckets)
    }

    fn name(&self) -> &'static str {
        "classify_urgency"
    }
}
