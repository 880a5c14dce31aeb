// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Values exchanged between the classification tasks.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{Incident, Urgency};

/// Pending incidents bucketed by urgency, each bucket in scan order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrgencyBuckets {
    #[serde(rename = "alta", default)]
    pub high: Vec<Incident>,
    #[serde(rename = "media", default)]
    pub medium: Vec<Incident>,
    #[serde(rename = "baja", default)]
    pub low: Vec<Incident>,
}

impl UrgencyBuckets {
    pub fn from_incidents(incidents: Vec<Incident>) -> Self {
        let mut buckets = Self::default();
        for incident in incidents {
            match incident.effective_urgency() {
                Urgency::High => buckets.high.push(incident),
                Urgency::Low => buckets.low.push(incident),
                Urgency::Medium | Urgency::Unrecognized(_) => buckets.medium.push(incident),
            }
        }
        buckets
    }

    /// Buckets in processing order: high, medium, low.
    pub fn ordered(&self) -> [(Urgency, &[Incident]); 3] {
        [
            (Urgency::High, self.high.as_slice()),
            (Urgency::Medium, self.medium.as_slice()),
            (Urgency::Low, self.low.as_slice()),
        ]
    }

    pub fn total(&self) -> usize {
        self.high.len() + self.medium.len() + self.low.len()
    }
}

/// A pending incident routed to the area responsible for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "incidenteId")]
    pub incident_id: String,
    #[serde(rename = "tipo")]
    pub category: String,
    #[serde(rename = "urgencia")]
    pub urgency: Urgency,
    pub area_responsable: String,
    #[serde(rename = "prioridad")]
    pub priority: u8,
}

/// Outcome of the status update loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateSummary {
    #[serde(rename = "actualizados")]
    pub updated: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UrgencyCounts {
    #[serde(rename = "alta")]
    pub high: usize,
    #[serde(rename = "media")]
    pub medium: usize,
    #[serde(rename = "baja")]
    pub low: usize,
}

/// Summary produced at the end of each classification run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "total_procesados")]
    pub total_processed: usize,
    #[serde(rename = "por_urgencia")]
    pub by_urgency: UrgencyCounts,
    /// Area address → number of assignments, in first-assigned order.
    #[serde(rename = "por_area")]
    pub by_area: IndexMap<String, usize>,
}

impl ClassificationReport {
    pub fn build(date: String, buckets: &UrgencyBuckets, assignments: &[Assignment]) -> Self {
        let mut by_area = IndexMap::new();
        for assignment in assignments {
            *by_area.entry(assignment.area_responsable.clone()).or_insert(0) += 1;
        }

        Self {
            date,
            total_processed: assignments.len(),
            by_urgency: UrgencyCounts {
                high: buckets.high.len(),
                medium: buckets.medium.len(),
                low: buckets.low.len(),
            },
            by_area,
        }
    }
}
