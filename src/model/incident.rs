// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Incident documents as stored in the `Incidentes` table.
//!
//! Field names follow the wire format used by the REST backend and the
//! document store (`incidenteId`, `estado`, `urgencia`, ...). Fields this crate
//! does not know about are kept in `extra` so a record survives a round trip
//! through the store untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Urgency level assigned when the incident was reported.
///
/// Labels outside the three known levels are kept verbatim so they are written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Urgency {
    High,
    Medium,
    Low,
    Unrecognized(String),
}

impl Urgency {
    /// Wire label used by the backend.
    pub fn label(&self) -> &str {
        match self {
            Urgency::High => "alta",
            Urgency::Medium => "media",
            Urgency::Low => "baja",
            Urgency::Unrecognized(label) => label,
        }
    }

    /// Assignment priority: 1 for high, 2 for medium, 3 for low.
    pub fn priority(&self) -> u8 {
        match self {
            Urgency::High => 1,
            Urgency::Medium | Urgency::Unrecognized(_) => 2,
            Urgency::Low => 3,
        }
    }
}

impl From<String> for Urgency {
    fn from(label: String) -> Self {
        let known = match label.as_str() {
            "alta" => Some(Urgency::High),
            "media" => Some(Urgency::Medium),
            "baja" => Some(Urgency::Low),
            _ => None,
        };
        known.unwrap_or_else(|| Urgency::Unrecognized(label))
    }
}

impl From<Urgency> for String {
    fn from(urgency: Urgency) -> Self {
        match urgency {
            Urgency::Unrecognized(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lifecycle status of an incident. Exactly one is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "en_atencion")]
    InProgress,
    #[serde(rename = "resuelto")]
    Resolved,
    #[serde(rename = "cancelado")]
    Cancelled,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Pending => "pendiente",
            Status::InProgress => "en_atencion",
            Status::Resolved => "resuelto",
            Status::Cancelled => "cancelado",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of an incident's free-form history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "accion")]
    pub action: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "canales", default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HistoryEntry {
    pub fn new(action: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            action: action.into(),
            date: date.to_rfc3339(),
            kind: None,
            channels: None,
            extra: Map::new(),
        }
    }
}

/// An incident record. Created externally; these workflows only read it,
/// change its status through the REST API and append to its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    #[serde(rename = "incidenteId")]
    pub id: String,
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "urgencia", default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
    #[serde(rename = "estado")]
    pub status: Status,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "ubicacion", default)]
    pub location: String,
    #[serde(rename = "fechaCreacion", default)]
    pub created_at: String,
    #[serde(rename = "historial", default)]
    pub history: Vec<HistoryEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Incident {
    /// Urgency used for classification. Missing or unrecognised labels count as medium.
    pub fn effective_urgency(&self) -> Urgency {
        match self.urgency {
            Some(Urgency::High) => Urgency::High,
            Some(Urgency::Low) => Urgency::Low,
            _ => Urgency::Medium,
        }
    }

    /// Category label, or `fallback` when the record has none.
    pub fn category_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.category.as_deref().unwrap_or(fallback)
    }

    /// Parse `fechaCreacion`. Accepts RFC 3339 with either `Z` or an explicit offset.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_deserialize_wire_format() {
        let incident: Incident = serde_json::from_value(json!({
            "incidenteId": "inc-1",
            "tipo": "Seguridad",
            "urgencia": "alta",
            "estado": "pendiente",
            "descripcion": "Puerta forzada",
            "ubicacion": "Pabellón A",
            "fechaCreacion": "2025-11-15T10:00:00Z",
            "historial": [{"accion": "creado", "fecha": "2025-11-15T10:00:00Z"}],
            "emailReportante": "alumno@utec.edu.pe"
        }))
        .unwrap();

        assert_eq!(incident.id, "inc-1");
        assert_eq!(incident.urgency, Some(Urgency::High));
        assert_eq!(incident.status, Status::Pending);
        assert_eq!(incident.history.len(), 1);
        assert_eq!(incident.extra["emailReportante"], "alumno@utec.edu.pe");
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = json!({
            "incidenteId": "inc-2",
            "estado": "en_atencion",
            "reportadoPor": {"nombre": "Ana"},
            "historial": [{"accion": "nota", "fecha": "x", "autor": "admin"}]
        });
        let incident: Incident = serde_json::from_value(raw).unwrap();
        let back = serde_json::to_value(&incident).unwrap();

        assert_eq!(back["reportadoPor"]["nombre"], "Ana");
        assert_eq!(back["historial"][0]["autor"], "admin");
        assert_eq!(back["estado"], "en_atencion");
    }

    #[test]
    fn test_effective_urgency_defaults_to_medium() {
        let missing: Incident =
            serde_json::from_value(json!({"incidenteId": "a", "estado": "pendiente"})).unwrap();
        let odd: Incident = serde_json::from_value(
            json!({"incidenteId": "b", "estado": "pendiente", "urgencia": "critica"}),
        )
        .unwrap();

        assert_eq!(missing.effective_urgency(), Urgency::Medium);
        assert_eq!(odd.urgency, Some(Urgency::Unrecognized("critica".into())));
        assert_eq!(odd.effective_urgency(), Urgency::Medium);
    }

    #[test]
    fn test_unrecognized_urgency_label_is_written_back() {
        let raw = json!({"incidenteId": "c", "estado": "pendiente", "urgencia": "critica"});
        let incident: Incident = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(serde_json::to_value(&incident).unwrap(), raw);
        assert_eq!(Urgency::from("alta".to_string()), Urgency::High);
        assert_eq!(String::from(Urgency::Low), "baja");
    }

    #[test]
    fn test_created_at_accepts_z_and_offsets() {
        let mut incident: Incident =
            serde_json::from_value(json!({"incidenteId": "a", "estado": "pendiente"})).unwrap();
        let expected = Utc.with_ymd_and_hms(2025, 11, 15, 15, 0, 0).unwrap();

        incident.created_at = "2025-11-15T15:00:00Z".into();
        assert_eq!(incident.created_at_utc(), Some(expected));

        incident.created_at = "2025-11-15T10:00:00-05:00".into();
        assert_eq!(incident.created_at_utc(), Some(expected));

        incident.created_at = "ayer".into();
        assert_eq!(incident.created_at_utc(), None);
    }

    #[test]
    fn test_priority_by_urgency() {
        assert_eq!(Urgency::High.priority(), 1);
        assert_eq!(Urgency::Medium.priority(), 2);
        assert_eq!(Urgency::Low.priority(), 3);
    }
}
