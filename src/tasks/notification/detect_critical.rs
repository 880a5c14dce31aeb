// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::engine::{TaskRequest, TaskResponse};
use crate::model::{CriticalIncident, CriticalReason, Incident, ScanFilter, Status, Urgency};
use crate::observability::messages::incidents::{
    CreationDateUnparseable, CriticalIncidentsDetected, IncidentsFetched,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{IncidentStore, Task};

/// Finds high-urgency incidents that need immediate attention.
///
/// An open incident older than `stale_after` is critical for `tiempo_excedido`;
/// otherwise a pending one is critical for `alta_prioridad`. Incidents already
/// in attention and still within the threshold are left alone.
pub struct DetectCriticalTask {
    store: Arc<dyn IncidentStore>,
    stale_after: Duration,
}

impl DetectCriticalTask {
    pub fn new(store: Arc<dyn IncidentStore>, stale_after: Duration) -> Self {
        Self { store, stale_after }
    }

    fn reason(&self, incident: &Incident, now: DateTime<Utc>) -> Option<CriticalReason> {
        // A cutoff before chrono's earliest date means nothing can be that old.
        let cutoff = now.checked_sub_signed(self.stale_after);

        match incident.created_at_utc() {
            Some(created)
                if cutoff.is_some_and(|cutoff| created < cutoff)
                    && incident.status != Status::Resolved =>
            {
                return Some(CriticalReason::TimeExceeded);
            }
            Some(_) => {}
            None => CreationDateUnparseable {
                incident_id: &incident.id,
                value: &incident.created_at,
            }
            .log(),
        }

        (incident.effective_urgency() == Urgency::High && incident.status == Status::Pending)
            .then_some(CriticalReason::HighPriority)
    }
}

#[async_trait]
impl Task for DetectCriticalTask {
    async fn run(&self, req: TaskRequest) -> TaskResponse {
        let filter = ScanFilter::status(Status::Pending)
            .or_status(Status::InProgress)
            .with_urgency(Urgency::High);

        let candidates = match self.store.scan(&filter).await {
            Ok(candidates) => candidates,
            Err(e) => return TaskResponse::error(503, format!("Failed to scan incidents: {}", e)),
        };

        IncidentsFetched {
            filter: "urgencia = alta AND estado IN (pendiente, en_atencion)",
            count: candidates.len(),
        }
        .log();

        let now = req.run.logical_time;
        let critical: Vec<CriticalIncident> = candidates
            .into_iter()
            .filter_map(|incident| {
                self.reason(&incident, now)
                    .map(|reason| CriticalIncident { incident, reason })
            })
            .collect();

        CriticalIncidentsDetected {
            count: critical.len(),
        }
        .log();

        TaskResponse::output(&critical)
    }

    fn name(&self) -> &'static str {
        "detect_critical"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::test_support::{output, request, TestServices};
    use serde_json::json;

    fn detect(services: &TestServices) -> DetectCriticalTask {
        DetectCriticalTask::new(services.store.clone(), Duration::minutes(30))
    }

    fn reasons(value: &serde_json::Value) -> Vec<(String, String)> {
        value
            .as_array()
            .unwrap()
            .iter()
            .map(|c| {
                (
                    c["incidenteId"].as_str().unwrap().to_string(),
                    c["razon"].as_str().unwrap().to_string(),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_reasons_by_age_and_status() {
        // noon() is 12:00Z; the threshold is 11:30Z.
        let services = TestServices::with_incidents(vec![
            json!({"incidenteId": "old-pending", "urgencia": "alta", "estado": "pendiente",
                   "fechaCreacion": "2025-11-15T11:00:00Z"}),
            json!({"incidenteId": "old-attended", "urgencia": "alta", "estado": "en_atencion",
                   "fechaCreacion": "2025-11-15T06:00:00-05:00"}),
            json!({"incidenteId": "fresh-pending", "urgencia": "alta", "estado": "pendiente",
                   "fechaCreacion": "2025-11-15T11:50:00Z"}),
            json!({"incidenteId": "fresh-attended", "urgencia": "alta", "estado": "en_atencion",
                   "fechaCreacion": "2025-11-15T11:45:00Z"}),
            json!({"incidenteId": "old-medium", "urgencia": "media", "estado": "pendiente",
                   "fechaCreacion": "2025-11-15T08:00:00Z"}),
            json!({"incidenteId": "old-resolved", "urgencia": "alta", "estado": "resuelto",
                   "fechaCreacion": "2025-11-15T08:00:00Z"}),
        ]);

        let value = output(detect(&services).run(request(vec![])).await);

        assert_eq!(
            reasons(&value),
            vec![
                ("old-pending".to_string(), "tiempo_excedido".to_string()),
                ("old-attended".to_string(), "tiempo_excedido".to_string()),
                ("fresh-pending".to_string(), "alta_prioridad".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_exact_threshold_is_not_stale() {
        let services = TestServices::with_incidents(vec![json!({
            "incidenteId": "edge", "urgencia": "alta", "estado": "en_atencion",
            "fechaCreacion": "2025-11-15T11:30:00Z"
        })]);

        let value = output(detect(&services).run(request(vec![])).await);
        assert_eq!(value, json!([]));
    }

    #[tokio::test]
    async fn test_unparseable_date_falls_back_to_priority_check() {
        let services = TestServices::with_incidents(vec![
            json!({"incidenteId": "p", "urgencia": "alta", "estado": "pendiente",
                   "fechaCreacion": "15/11/2025"}),
            json!({"incidenteId": "q", "urgencia": "alta", "estado": "en_atencion"}),
        ]);

        let value = output(detect(&services).run(request(vec![])).await);
        assert_eq!(reasons(&value), vec![("p".to_string(), "alta_prioridad".to_string())]);
    }

    #[tokio::test]
    async fn test_output_keeps_the_full_record() {
        let services = TestServices::with_incidents(vec![json!({
            "incidenteId": "x", "urgencia": "alta", "estado": "pendiente", "tipo": "Seguridad",
            "descripcion": "Humo en el sótano", "ubicacion": "Torre B",
            "fechaCreacion": "2025-11-15T11:55:00Z", "reportadoPor": "guardia"
        })]);

        let value = output(detect(&services).run(request(vec![])).await);
        let critical: Vec<CriticalIncident> = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(critical[0].incident.location, "Torre B");
        assert_eq!(critical[0].reason, CriticalReason::HighPriority);
        assert_eq!(value[0]["reportadoPor"], "guardia");
    }

    #[tokio::test]
    async fn test_threshold_is_configurable() {
        let services = TestServices::with_incidents(vec![json!({
            "incidenteId": "y", "urgencia": "alta", "estado": "en_atencion",
            "fechaCreacion": "2025-11-15T11:50:00Z"
        })]);
        let task = DetectCriticalTask::new(services.store.clone(), Duration::minutes(5));

        let value = output(task.run(request(vec![])).await);
        assert_eq!(reasons(&value), vec![("y".to_string(), "tiempo_excedido".to_string())]);
    }

    #[tokio::test]
    async fn test_threshold_beyond_calendar_range_is_never_exceeded() {
        let services = TestServices::with_incidents(vec![
            json!({"incidenteId": "ancient", "urgencia": "alta", "estado": "en_atencion",
                   "fechaCreacion": "1970-01-01T00:00:00Z"}),
            json!({"incidenteId": "waiting", "urgencia": "alta", "estado": "pendiente",
                   "fechaCreacion": "1970-01-01T00:00:00Z"}),
        ]);
        let task = DetectCriticalTask::new(
            services.store.clone(),
            Duration::try_minutes(200_000_000_000).unwrap(),
        );

        let value = output(task.run(request(vec![])).await);
        assert_eq!(
            reasons(&value),
            vec![("waiting".to_string(), "alta_prioridad".to_string())]
        );
    }
}
