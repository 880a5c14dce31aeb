// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use indexmap::IndexMap;
use std::fmt::Write;
use std::sync::Arc;

use crate::config::consts::UNCATEGORIZED_ALERT_LABEL;
use crate::engine::{TaskRequest, TaskResponse};
use crate::model::{CriticalIncident, EmailDraft, RoutingTable};
use crate::observability::messages::incidents::EmailDraftsPrepared;
use crate::observability::messages::StructuredLog;
use crate::traits::Task;

/// Composes one HTML email per responsible area. Nothing is sent here.
pub struct PrepareEmailsTask {
    input: String,
    routing: Arc<RoutingTable>,
    dashboard_url: String,
}

impl PrepareEmailsTask {
    pub fn new(
        input: impl Into<String>,
        routing: Arc<RoutingTable>,
        dashboard_url: impl Into<String>,
    ) -> Self {
        Self {
            input: input.into(),
            routing,
            dashboard_url: dashboard_url.into(),
        }
    }

    /// Group by area address, keeping first-seen order of both areas and incidents.
    fn group<'a>(
        &self,
        critical: &'a [CriticalIncident],
    ) -> IndexMap<String, Vec<&'a CriticalIncident>> {
        let mut by_area: IndexMap<String, Vec<&CriticalIncident>> = IndexMap::new();
        for item in critical {
            let category = item.incident.category_or(UNCATEGORIZED_ALERT_LABEL);
            by_area
                .entry(self.routing.address_for(category).to_string())
                .or_default()
                .push(item);
        }
        by_area
    }

    fn render(&self, incidents: &[&CriticalIncident]) -> String {
        let mut body = String::new();
        body.push_str("<h2>🚨 Alerta de Incidentes Críticos - UTEC</h2>\n");
        let _ = writeln!(
            body,
            "<p>Se han detectado {} incidentes que requieren atención inmediata:</p>",
            incidents.len()
        );
        body.push_str("<ul>\n");

        for item in incidents {
            let incident = &item.incident;
            let _ = write!(
                body,
                "<li>\n\
                 <strong>ID:</strong> {}<br>\n\
                 <strong>Tipo:</strong> {}<br>\n\
                 <strong>Ubicación:</strong> {}<br>\n\
                 <strong>Descripción:</strong> {}<br>\n\
                 <strong>Estado:</strong> {}<br>\n\
                 <strong>Urgencia:</strong> {}<br>\n\
                 <strong>Fecha:</strong> {}<br>\n\
                 <hr>\n\
                 </li>\n",
                incident.id,
                incident.category_or(UNCATEGORIZED_ALERT_LABEL),
                incident.location,
                incident.description,
                incident.status,
                incident.effective_urgency(),
                incident.created_at,
            );
        }

        body.push_str("</ul>\n");
        body.push_str("<p>Por favor, atiendan estos incidentes lo antes posible.</p>\n");
        let _ = writeln!(body, "<p><a href=\"{}\">Ver Dashboard</a></p>", self.dashboard_url);
        body
    }
}

#[async_trait]
impl Task for PrepareEmailsTask {
    async fn run(&self, req: TaskRequest) -> TaskResponse {
        let critical: Vec<CriticalIncident> = match req.pull(&self.input) {
            Ok(critical) => critical,
            Err(e) => return e.into(),
        };

        let drafts: Vec<EmailDraft> = self
            .group(&critical)
            .into_iter()
            .map(|(recipient, incidents)| EmailDraft {
                subject: format!("🚨 {} Incidentes Críticos Pendientes", incidents.len()),
                body: self.render(&incidents),
                incident_ids: incidents.iter().map(|i| i.incident.id.clone()).collect(),
                recipient,
            })
            .collect();

        EmailDraftsPrepared {
            drafts: drafts.len(),
            incidents: critical.len(),
        }
        .log();

        TaskResponse::output(&drafts)
    }

    fn name(&self) -> &'static str {
        "prepare_emails"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::test_support::{output, request};
    use serde_json::json;

    fn task() -> PrepareEmailsTask {
        PrepareEmailsTask::new(
            "detect",
            Arc::new(RoutingTable::default()),
            "https://alerta-utec.com/dashboard",
        )
    }

    fn critical() -> serde_json::Value {
        json!([
            {"incidenteId": "s1", "tipo": "Seguridad", "urgencia": "alta", "estado": "pendiente",
             "descripcion": "Robo de laptop", "ubicacion": "Aula 201",
             "fechaCreacion": "2025-11-15T10:00:00Z", "razon": "tiempo_excedido"},
            {"incidenteId": "g1", "urgencia": "alta", "estado": "en_atencion",
             "descripcion": "Ruido extraño", "ubicacion": "Patio",
             "fechaCreacion": "2025-11-15T09:00:00Z", "razon": "tiempo_excedido"},
            {"incidenteId": "s2", "tipo": "Seguridad", "urgencia": "alta", "estado": "pendiente",
             "descripcion": "Puerta forzada", "ubicacion": "Pabellón C",
             "fechaCreacion": "2025-11-15T11:50:00Z", "razon": "alta_prioridad"},
            {"incidenteId": "x1", "tipo": "Mantenimiento", "urgencia": "alta", "estado": "pendiente",
             "descripcion": "Ascensor detenido", "ubicacion": "Torre A",
             "fechaCreacion": "2025-11-15T11:55:00Z", "razon": "alta_prioridad"}
        ])
    }

    #[tokio::test]
    async fn test_one_draft_per_area_in_first_seen_order() {
        let value = output(task().run(request(vec![("detect", critical())])).await);
        let drafts: Vec<EmailDraft> = serde_json::from_value(value).unwrap();

        let summary: Vec<(&str, &str, Vec<&str>)> = drafts
            .iter()
            .map(|d| {
                (
                    d.recipient.as_str(),
                    d.subject.as_str(),
                    d.incident_ids.iter().map(String::as_str).collect(),
                )
            })
            .collect();

        assert_eq!(
            summary,
            vec![
                (
                    "seguridad@utec.edu.pe",
                    "🚨 2 Incidentes Críticos Pendientes",
                    vec!["s1", "s2"]
                ),
                (
                    "soporte@utec.edu.pe",
                    "🚨 2 Incidentes Críticos Pendientes",
                    vec!["g1", "x1"]
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_body_lists_every_incident_and_links_dashboard() {
        let value = output(task().run(request(vec![("detect", critical())])).await);
        let drafts: Vec<EmailDraft> = serde_json::from_value(value).unwrap();
        let body = &drafts[1].body;

        assert!(body.contains("Se han detectado 2 incidentes"));
        assert!(body.contains("<strong>ID:</strong> g1<br>"));
        assert!(body.contains("<strong>Tipo:</strong> General<br>"));
        assert!(body.contains("<strong>Tipo:</strong> Mantenimiento<br>"));
        assert!(body.contains("<strong>Estado:</strong> en_atencion<br>"));
        assert!(body.contains("<strong>Urgencia:</strong> alta<br>"));
        assert!(body.contains("<strong>Fecha:</strong> 2025-11-15T09:00:00Z<br>"));
        assert!(body.contains("<a href=\"https://alerta-utec.com/dashboard\">Ver Dashboard</a>"));
        assert!(!body.contains("s1"));
    }

    #[tokio::test]
    async fn test_wire_field_names() {
        let value = output(task().run(request(vec![("detect", critical())])).await);
        let first = value[0].as_object().unwrap();

        assert_eq!(
            first.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["destinatario", "asunto", "contenido", "incidentes"]
        );
    }

    #[tokio::test]
    async fn test_no_critical_incidents_no_drafts() {
        let value = output(task().run(request(vec![("detect", json!([]))])).await);
        assert_eq!(value, json!([]));
    }
}
