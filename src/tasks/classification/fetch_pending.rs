// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::sync::Arc;

use crate::engine::{TaskRequest, TaskResponse};
use crate::model::{ScanFilter, Status};
use crate::observability::messages::incidents::IncidentsFetched;
use crate::observability::messages::StructuredLog;
use crate::traits::{IncidentStore, Task};

/// Scans the table for pending incidents and publishes them in scan order.
pub struct FetchPendingTask {
    store: Arc<dyn IncidentStore>,
}

impl FetchPendingTask {
    pub fn new(store: Arc<dyn IncidentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Task for FetchPendingTask {
    async fn run(&self, _req: TaskRequest) -> TaskResponse {
        let filter = ScanFilter::status(Status::Pending);
        let incidents = match self.store.scan(&filter).await {
            Ok(incidents) => incidents,
            Err(e) => return TaskResponse::error(503, format!("Failed to scan incidents: {}", e)),
        };

        IncidentsFetched {
            filter: "estado = pendiente",
            count: incidents.len(),
        }
        .log();

        TaskResponse::output(&incidents)
    }

    fn name(&self) -> &'static str {
        "fetch_pending"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::JsonFileStore;
    use crate::engine::Outcome;
    use crate::tasks::test_support::{output, request, TestServices};
    use serde_json::json;

    #[tokio::test]
    async fn test_fetches_only_pending_in_scan_order() {
        let services = TestServices::with_incidents(vec![
            json!({"incidenteId": "a", "estado": "pendiente", "urgencia": "baja"}),
            json!({"incidenteId": "b", "estado": "en_atencion", "urgencia": "alta"}),
            json!({"incidenteId": "c", "estado": "pendiente"}),
            json!({"incidenteId": "d", "estado": "resuelto"}),
        ]);
        let task = FetchPendingTask::new(services.store.clone());

        let value = output(task.run(request(vec![])).await);
        let ids: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["incidenteId"].as_str().unwrap())
            .collect();

        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_empty_table_yields_empty_list() {
        let task = FetchPendingTask::new(TestServices::new().store.clone());
        assert_eq!(output(task.run(request(vec![])).await), json!([]));
    }

    #[tokio::test]
    async fn test_store_failure_fails_the_task() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incidentes.json");
        std::fs::write(&path, "{ not json").unwrap();

        let task = FetchPendingTask::new(Arc::new(JsonFileStore::new(path)));
        let response = task.run(request(vec![])).await;

        match response.outcome {
            Outcome::Error(e) => {
                assert_eq!(e.code, 503);
                assert!(e.message.contains("Failed to scan incidents"));
            }
            Outcome::Output(_) => panic!("expected the scan to fail"),
        }
    }
}
