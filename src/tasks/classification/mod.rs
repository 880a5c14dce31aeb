// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tasks of the `clasificar_incidentes` workflow:
//! `fetch_pending >> classify_urgency >> assign_area >> update_status >> classification_report`.

pub mod assign_area;
pub mod classify_urgency;
pub mod fetch_pending;
pub mod report;
pub mod update_status;

pub use assign_area::AssignAreaTask;
pub use classify_urgency::ClassifyUrgencyTask;
pub use fetch_pending::FetchPendingTask;
pub use report::ClassificationReportTask;
pub use update_status::UpdateStatusTask;
