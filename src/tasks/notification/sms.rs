// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::consts::{SMS_CATEGORY, SMS_DESCRIPTION_LIMIT};
use crate::engine::{TaskRequest, TaskResponse};
use crate::model::{CriticalIncident, Incident, SmsSummary, Urgency};
use crate::observability::messages::incidents::{BatchCompleted, DeliveryFailed, NoSmsCandidates};
use crate::observability::messages::StructuredLog;
use crate::traits::{SmsGateway, Task};

/// Texts every emergency contact about high-urgency security incidents.
pub struct SmsAlertTask {
    input: String,
    gateway: Arc<dyn SmsGateway>,
    contacts: Vec<String>,
}

impl SmsAlertTask {
    pub fn new(
        input: impl Into<String>,
        gateway: Arc<dyn SmsGateway>,
        contacts: Vec<String>,
    ) -> Self {
        Self {
            input: input.into(),
            gateway,
            contacts,
        }
    }
}

fn needs_sms(incident: &Incident) -> bool {
    incident.category.as_deref() == Some(SMS_CATEGORY) && incident.urgency == Some(Urgency::High)
}

/// SMS body; the description is cut to its first characters.
pub fn sms_text(incident: &Incident) -> String {
    let description: String = incident
        .description
        .chars()
        .take(SMS_DESCRIPTION_LIMIT)
        .collect();

    format!(
        "🚨 ALERTA UTEC\nTipo: {}\nUbicación: {}\nDescripción: {}\nID: {}",
        incident.category_or(SMS_CATEGORY),
        incident.location,
        description,
        incident.id
    )
}

#[async_trait]
impl Task for SmsAlertTask {
    async fn run(&self, req: TaskRequest) -> TaskResponse {
        let critical: Vec<CriticalIncident> = match req.pull(&self.input) {
            Ok(critical) => critical,
            Err(e) => return e.into(),
        };

        let candidates: Vec<&Incident> = critical
            .iter()
            .map(|c| &c.incident)
            .filter(|i| needs_sms(i))
            .collect();

        if candidates.is_empty() {
            NoSmsCandidates {
                category: SMS_CATEGORY,
            }
            .log();
            return TaskResponse::output(&SmsSummary::default());
        }

        let mut summary = SmsSummary::default();
        for incident in candidates {
            let text = sms_text(incident);
            let mut reached = false;

            for number in &self.contacts {
                match self.gateway.send(number, &text).await {
                    Ok(()) => {
                        summary.sent += 1;
                        reached = true;
                    }
                    Err(e) => {
                        summary.failed += 1;
                        DeliveryFailed {
                            channel: "sms",
                            recipient: number,
                            incident_id: &incident.id,
                            error: &e,
                        }
                        .log();
                    }
                }
            }

            if reached {
                summary.incident_ids.push(incident.id.clone());
            }
        }

        BatchCompleted {
            action: "sms alerts",
            succeeded: summary.sent,
            total: summary.sent + summary.failed,
        }
        .log();

        TaskResponse::output(&summary)
    }

    fn name(&self) -> &'static str {
        "sms_alert"
    }
}
