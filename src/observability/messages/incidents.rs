// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the classification and notification tasks and the
//! dry-run channels they talk to.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Result of a filtered scan of the incident table.
///
/// # Log Level
/// `info!` - Important operational event
pub struct IncidentsFetched<'a> {
    pub filter: &'a str,
    pub count: usize,
}

impl Display for IncidentsFetched<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Found {} incidents matching {}",
            self.count, self.filter
        )
    }
}

impl StructuredLog for IncidentsFetched<'_> {
    fn log(&self) {
        tracing::info!(filter = self.filter, count = self.count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("incidents_fetched", span_name = name, filter = self.filter)
    }
}

/// Bucket sizes after urgency classification.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use alerta_flows::observability::messages::incidents::UrgencyClassified;
///
/// let msg = UrgencyClassified { high: 2, medium: 1, low: 0 };
/// assert_eq!(msg.to_string(), "Classified incidents: alta=2, media=1, baja=0");
/// ```
pub struct UrgencyClassified {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl Display for UrgencyClassified {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Classified incidents: alta={}, media={}, baja={}",
            self.high, self.medium, self.low
        )
    }
}

impl StructuredLog for UrgencyClassified {
    fn log(&self) {
        tracing::info!(
            high = self.high,
            medium = self.medium,
            low = self.low,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("urgency_classified", span_name = name)
    }
}

/// Responsible areas were assigned.
pub struct AreasAssigned {
    pub count: usize,
}

impl Display for AreasAssigned {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Assigned responsible areas to {} incidents", self.count)
    }
}

impl StructuredLog for AreasAssigned {
    fn log(&self) {
        tracing::info!(count = self.count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("areas_assigned", span_name = name, count = self.count)
    }
}

/// The REST API rejected or failed a status change.
///
/// # Log Level
/// `warn!` - The run continues with the remaining incidents
pub struct StatusUpdateFailed<'a> {
    pub incident_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for StatusUpdateFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to update status of incident '{}': {}",
            self.incident_id, self.error
        )
    }
}

impl StructuredLog for StatusUpdateFailed<'_> {
    fn log(&self) {
        tracing::warn!(incident_id = self.incident_id, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "status_update_failed",
            span_name = name,
            incident_id = self.incident_id,
        )
    }
}

/// Summary of a batch of deliveries (status updates, alerts, SMS, history writes).
///
/// # Log Level
/// `info!` - Important operational event
pub struct BatchCompleted<'a> {
    pub action: &'a str,
    pub succeeded: usize,
    pub total: usize,
}

impl Display for BatchCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}: {}/{} succeeded", self.action, self.succeeded, self.total)
    }
}

impl StructuredLog for BatchCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            action = self.action,
            succeeded = self.succeeded,
            total = self.total,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("batch", span_name = name, action = self.action)
    }
}

/// Classification report, rendered as pretty JSON.
pub struct ClassificationReportReady<'a> {
    pub total_processed: usize,
    pub rendered: &'a str,
}

impl Display for ClassificationReportReady<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Classification report:\n{}", self.rendered)
    }
}

impl StructuredLog for ClassificationReportReady<'_> {
    fn log(&self) {
        tracing::info!(total_processed = self.total_processed, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "classification_report",
            span_name = name,
            total_processed = self.total_processed,
        )
    }
}

/// Critical incidents detected in this run.
pub struct CriticalIncidentsDetected {
    pub count: usize,
}

impl Display for CriticalIncidentsDetected {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Detected {} critical incidents", self.count)
    }
}

impl StructuredLog for CriticalIncidentsDetected {
    fn log(&self) {
        tracing::info!(count = self.count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("critical_detected", span_name = name, count = self.count)
    }
}

/// `fechaCreacion` could not be parsed, so the staleness rule was not applied.
///
/// # Log Level
/// `warn!` - Data quality problem
pub struct CreationDateUnparseable<'a> {
    pub incident_id: &'a str,
    pub value: &'a str,
}

impl Display for CreationDateUnparseable<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Incident '{}' has an unparseable creation date '{}'",
            self.incident_id, self.value
        )
    }
}

impl StructuredLog for CreationDateUnparseable<'_> {
    fn log(&self) {
        tracing::warn!(incident_id = self.incident_id, value = self.value, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "creation_date_unparseable",
            span_name = name,
            incident_id = self.incident_id,
        )
    }
}

/// A stored document does not decode as an incident and was left out of a scan.
///
/// # Log Level
/// `warn!` - Data quality problem
pub struct UndecodableIncident<'a> {
    /// `incidenteId` when the document has one
    pub incident_id: Option<&'a str>,
    pub error: &'a serde_json::Error,
}

impl Display for UndecodableIncident<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Skipping incident '{}': {}",
            self.incident_id.unwrap_or("<sin id>"),
            self.error
        )
    }
}

impl StructuredLog for UndecodableIncident<'_> {
    fn log(&self) {
        tracing::warn!(
            incident_id = self.incident_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("undecodable_incident", span_name = name)
    }
}

/// A notification to one recipient could not be delivered.
///
/// # Log Level
/// `warn!` - The run continues with the remaining recipients
pub struct DeliveryFailed<'a> {
    pub channel: &'a str,
    pub recipient: &'a str,
    pub incident_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for DeliveryFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to deliver {} notification for incident '{}' to {}: {}",
            self.channel, self.incident_id, self.recipient, self.error
        )
    }
}

impl StructuredLog for DeliveryFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            channel = self.channel,
            recipient = self.recipient,
            incident_id = self.incident_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "delivery_failed",
            span_name = name,
            channel = self.channel,
            incident_id = self.incident_id,
        )
    }
}

/// Email drafts were composed.
pub struct EmailDraftsPrepared {
    pub drafts: usize,
    pub incidents: usize,
}

impl Display for EmailDraftsPrepared {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Prepared {} emails covering {} incidents",
            self.drafts, self.incidents
        )
    }
}

impl StructuredLog for EmailDraftsPrepared {
    fn log(&self) {
        tracing::info!(drafts = self.drafts, incidents = self.incidents, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("email_drafts", span_name = name, drafts = self.drafts)
    }
}

/// No incident qualified for an SMS alert.
pub struct NoSmsCandidates<'a> {
    pub category: &'a str,
}

impl Display for NoSmsCandidates<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "No high urgency '{}' incidents, no SMS sent",
            self.category
        )
    }
}

impl StructuredLog for NoSmsCandidates<'_> {
    fn log(&self) {
        tracing::info!(category = self.category, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("no_sms_candidates", span_name = name)
    }
}

/// A dry-run channel received a message it would have delivered.
///
/// # Log Level
/// `info!` - Dry runs are meant to be read
pub struct DryRunDelivery<'a> {
    pub channel: &'a str,
    pub recipient: &'a str,
    pub content: &'a str,
}

impl Display for DryRunDelivery<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "[dry-run] {} to {}: {}",
            self.channel, self.recipient, self.content
        )
    }
}

impl StructuredLog for DryRunDelivery<'_> {
    fn log(&self) {
        tracing::info!(
            channel = self.channel,
            recipient = self.recipient,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("dry_run", span_name = name, channel = self.channel)
    }
}
