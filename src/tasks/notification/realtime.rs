// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use crate::engine::{TaskRequest, TaskResponse};
use crate::model::{AlertMessage, CriticalIncident, DispatchSummary};
use crate::observability::messages::incidents::{BatchCompleted, DeliveryFailed};
use crate::observability::messages::StructuredLog;
use crate::traits::{RealtimeChannel, Task};

const ALERT_KIND: &str = "alerta_critica";

/// Pushes one `alerta_critica` message per critical incident to connected dashboards.
pub struct RealtimeAlertTask {
    input: String,
    channel: Arc<dyn RealtimeChannel>,
}

impl RealtimeAlertTask {
    pub fn new(input: impl Into<String>, channel: Arc<dyn RealtimeChannel>) -> Self {
        Self {
            input: input.into(),
            channel,
        }
    }
}

fn alert_for(critical: &CriticalIncident, timestamp: &str) -> AlertMessage {
    let incident = &critical.incident;
    AlertMessage {
        kind: ALERT_KIND.to_string(),
        incident_id: incident.id.clone(),
        urgency: incident.urgency.clone(),
        description: incident.description.clone(),
        location: incident.location.clone(),
        reason: critical.reason,
        timestamp: timestamp.to_string(),
    }
}

#[async_trait]
impl Task for RealtimeAlertTask {
    async fn run(&self, req: TaskRequest) -> TaskResponse {
        let critical: Vec<CriticalIncident> = match req.pull(&self.input) {
            Ok(critical) => critical,
            Err(e) => return e.into(),
        };

        let timestamp = req.run.logical_time.to_rfc3339();
        let mut summary = DispatchSummary::default();

        for item in &critical {
            let alert = alert_for(item, &timestamp);
            match self.channel.publish(&alert).await {
                Ok(()) => summary.sent += 1,
                Err(e) => {
                    summary.failed += 1;
                    DeliveryFailed {
                        channel: "websocket",
                        recipient: "dashboards",
                        incident_id: &item.incident.id,
                        error: &e,
                    }
                    .log();
                }
            }
        }

        BatchCompleted {
            action: "websocket alerts",
            succeeded: summary.sent,
            total: critical.len(),
        }
        .log();

        TaskResponse::output(&summary)
    }

    fn name(&self) -> &'static str {
        "realtime_alert"
    }
}
