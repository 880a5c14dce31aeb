// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::model::{Incident, Status, Urgency};

/// Filter expression applied by [`IncidentStore::scan`](crate::traits::IncidentStore::scan).
///
/// Equivalent to `urgencia = :u AND (estado = :s1 OR estado = :s2 ...)`.
/// An empty `statuses` list matches any status; `urgency: None` matches any urgency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanFilter {
    pub urgency: Option<Urgency>,
    pub statuses: Vec<Status>,
}

impl ScanFilter {
    pub fn status(status: Status) -> Self {
        Self {
            urgency: None,
            statuses: vec![status],
        }
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(urgency);
        self
    }

    pub fn or_status(mut self, status: Status) -> Self {
        self.statuses.push(status);
        self
    }

    /// Compares against the stored urgency label, not the classification default.
    pub fn matches(&self, incident: &Incident) -> bool {
        let urgency_ok = match &self.urgency {
            Some(wanted) => incident.urgency.as_ref() == Some(wanted),
            None => true,
        };
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&incident.status);
        urgency_ok && status_ok
    }
}
