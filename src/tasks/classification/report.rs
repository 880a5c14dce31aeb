// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::path::PathBuf;

use crate::engine::{TaskRequest, TaskResponse};
use crate::model::{Assignment, ClassificationReport, UrgencyBuckets};
use crate::observability::messages::incidents::ClassificationReportReady;
use crate::observability::messages::StructuredLog;
use crate::traits::Task;

/// Summarises a classification run by urgency and by area.
///
/// The report is logged as pretty JSON. With a `report_dir`, it is also written
/// to `reporte_clasificacion_<timestamp>.json` in that directory.
pub struct ClassificationReportTask {
    buckets: String,
    assignments: String,
    report_dir: Option<PathBuf>,
}

impl ClassificationReportTask {
    pub fn new(
        buckets: impl Into<String>,
        assignments: impl Into<String>,
        report_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            buckets: buckets.into(),
            assignments: assignments.into(),
            report_dir,
        }
    }

    async fn persist(&self, req: &TaskRequest, rendered: &str) -> std::io::Result<()> {
        let Some(dir) = &self.report_dir else {
            return Ok(());
        };
        tokio::fs::create_dir_all(dir).await?;
        let file_name = format!(
            "reporte_clasificacion_{}.json",
            req.run.logical_time.format("%Y%m%dT%H%M%SZ")
        );
        tokio::fs::write(dir.join(file_name), rendered).await
    }
}

#[async_trait]
impl Task for ClassificationReportTask {
    async fn run(&self, req: TaskRequest) -> TaskResponse {
        let buckets: UrgencyBuckets = match req.pull(&self.buckets) {
            Ok(buckets) => buckets,
            Err(e) => return e.into(),
        };
        let assignments: Vec<Assignment> = match req.pull(&self.assignments) {
            Ok(assignments) => assignments,
            Err(e) => return e.into(),
        };

        let report =
            ClassificationReport::build(req.run.logical_time.to_rfc3339(), &buckets, &assignments);

        let rendered = match serde_json::to_string_pretty(&report) {
            Ok(rendered) => rendered,
            Err(e) => return TaskResponse::error(500, format!("Failed to render report: {}", e)),
        };

        ClassificationReportReady {
            total_processed: report.total_processed,
            rendered: &rendered,
        }
        .log();

        if let Err(e) = self.persist(&req, &rendered).await {
            return TaskResponse::error(500, format!("Failed to write report: {}", e));
        }

        TaskResponse::output(&report)
    }

    fn name(&self) -> &'static str {
        "classification_report"
    }
}
