// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use crate::engine::{TaskRequest, TaskResponse};
use crate::model::{CriticalIncident, HistoryEntry, RecordSummary, SmsSummary};
use crate::observability::messages::incidents::{BatchCompleted, DeliveryFailed};
use crate::observability::messages::StructuredLog;
use crate::traits::{IncidentStore, Task};

const NOTIFIED_ACTION: &str = "notificacion_enviada";
const AUTOMATIC: &str = "automatica";

/// Appends a `notificacion_enviada` entry to the history of every critical incident.
pub struct RecordNotificationsTask {
    input: String,
    sms: String,
    store: Arc<dyn IncidentStore>,
}

impl RecordNotificationsTask {
    pub fn new(
        input: impl Into<String>,
        sms: impl Into<String>,
        store: Arc<dyn IncidentStore>,
    ) -> Self {
        Self {
            input: input.into(),
            sms: sms.into(),
            store,
        }
    }
}

#[async_trait]
impl Task for RecordNotificationsTask {
    async fn run(&self, req: TaskRequest) -> TaskResponse {
        let critical: Vec<CriticalIncident> = match req.pull(&self.input) {
            Ok(critical) => critical,
            Err(e) => return e.into(),
        };
        // Without an SMS result, no incident is recorded as texted.
        let texted = req
            .pull::<SmsSummary>(&self.sms)
            .map(|s| s.incident_ids)
            .unwrap_or_default();

        let mut summary = RecordSummary {
            recorded: 0,
            total: critical.len(),
        };

        for item in critical {
            let incident = item.incident;
            let mut channels = vec!["websocket".to_string(), "email".to_string()];
            if texted.contains(&incident.id) {
                channels.push("sms".to_string());
            }

            let mut entry = HistoryEntry::new(NOTIFIED_ACTION, req.run.logical_time);
            entry.kind = Some(AUTOMATIC.to_string());
            entry.channels = Some(channels);

            let mut history = incident.history;
            history.push(entry);

            match self.store.set_history(&incident.id, history).await {
                Ok(()) => summary.recorded += 1,
                Err(e) => DeliveryFailed {
                    channel: "history",
                    recipient: "Incidentes",
                    incident_id: &incident.id,
                    error: &e,
                }
                .log(),
            }
        }

        BatchCompleted {
            action: "history records",
            succeeded: summary.recorded,
            total: summary.total,
        }
        .log();

        TaskResponse::output(&summary)
    }

    fn name(&self) -> &'static str {
        "record_notifications"
    }
}
