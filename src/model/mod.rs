// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod classification;
mod filter;
mod incident;
mod notification;
mod routing;

pub use classification::{
    Assignment, ClassificationReport, UpdateSummary, UrgencyBuckets, UrgencyCounts,
};
pub use filter::ScanFilter;
pub use incident::{HistoryEntry, Incident, Status, Urgency};
pub use notification::{
    AlertMessage, CriticalIncident, CriticalReason, DispatchSummary, EmailDraft, RecordSummary,
    SmsSummary,
};
pub use routing::RoutingTable;
