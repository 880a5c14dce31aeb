// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::consts::UNCATEGORIZED_ASSIGNMENT_LABEL;
use crate::engine::{TaskRequest, TaskResponse};
use crate::model::{Assignment, RoutingTable, UrgencyBuckets};
use crate::observability::messages::incidents::AreasAssigned;
use crate::observability::messages::StructuredLog;
use crate::traits::Task;

/// Routes each classified incident to its responsible area, high urgency first.
pub struct AssignAreaTask {
    input: String,
    routing: Arc<RoutingTable>,
}

impl AssignAreaTask {
    pub fn new(input: impl Into<String>, routing: Arc<RoutingTable>) -> Self {
        Self {
            input: input.into(),
            routing,
        }
    }

    fn assign(&self, buckets: &UrgencyBuckets) -> Vec<Assignment> {
        let routing = self.routing.as_ref();
        buckets
            .ordered()
            .into_iter()
            .flat_map(move |(urgency, incidents)| {
                incidents.iter().map(move |incident| {
                    let category = incident.category_or(UNCATEGORIZED_ASSIGNMENT_LABEL);
                    Assignment {
                        incident_id: incident.id.clone(),
                        category: category.to_string(),
                        urgency: urgency.clone(),
                        area_responsable: routing.address_for(category).to_string(),
                        priority: urgency.priority(),
                    }
                })
            })
            .collect()
    }
}

#[async_trait]
impl Task for AssignAreaTask {
    async fn run(&self, req: TaskRequest) -> TaskResponse {
        let buckets: UrgencyBuckets = match req.pull(&self.input) {
            Ok(buckets) => buckets,
            Err(e) => return e.into(),
        };

        let assignments = self.assign(&buckets);
        AreasAssigned {
            count: assignments.len(),
        }
        .log();

        TaskResponse::output(&assignments)
    }

    fn name(&self) -> &'static str {
        "assign_area"
    }
}
