// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Values exchanged between the notification tasks.

use serde::{Deserialize, Serialize};

use crate::model::{Incident, Urgency};

/// Why an incident was flagged as critical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriticalReason {
    /// Unresolved for longer than the staleness threshold.
    #[serde(rename = "tiempo_excedido")]
    TimeExceeded,
    /// High urgency and still pending.
    #[serde(rename = "alta_prioridad")]
    HighPriority,
}

impl CriticalReason {
    pub fn label(&self) -> &'static str {
        match self {
            CriticalReason::TimeExceeded => "tiempo_excedido",
            CriticalReason::HighPriority => "alta_prioridad",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalIncident {
    #[serde(flatten)]
    pub incident: Incident,
    #[serde(rename = "razon")]
    pub reason: CriticalReason,
}

/// Real-time alert pushed through the WebSocket gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMessage {
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "incidenteId")]
    pub incident_id: String,
    #[serde(rename = "urgencia")]
    pub urgency: Option<Urgency>,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "ubicacion")]
    pub location: String,
    #[serde(rename = "razon")]
    pub reason: CriticalReason,
    pub timestamp: String,
}

/// Email composed for one responsible area. Delivery is handled elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailDraft {
    #[serde(rename = "destinatario")]
    pub recipient: String,
    #[serde(rename = "asunto")]
    pub subject: String,
    #[serde(rename = "contenido")]
    pub body: String,
    #[serde(rename = "incidentes")]
    pub incident_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchSummary {
    #[serde(rename = "enviados")]
    pub sent: usize,
    #[serde(rename = "fallidos")]
    pub failed: usize,
}

/// SMS fan-out result; `incident_ids` lists incidents that reached at least one contact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmsSummary {
    #[serde(rename = "enviados")]
    pub sent: usize,
    #[serde(rename = "fallidos")]
    pub failed: usize,
    #[serde(rename = "incidentes")]
    pub incident_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    #[serde(rename = "registrados")]
    pub recorded: usize,
    pub total: usize,
}
