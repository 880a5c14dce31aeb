// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::engine::{Outcome, RunContext, TaskResponse};

/// Everything a finished run produced.
///
/// Under `fail_fast` a run either completes fully or returns an error, so
/// `failed` and `skipped` are only populated by the lenient strategies.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run: RunContext,
    /// Final response of every task that ran, keyed by task ID.
    pub results: HashMap<String, TaskResponse>,
    /// Tasks whose last attempt returned an error, in completion order.
    pub failed: Vec<String>,
    /// Tasks never started because an upstream task did not succeed.
    pub skipped: Vec<String>,
    pub duration: Duration,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.results.values().filter(|r| r.is_success()).count()
    }

    /// Output of a successful task.
    pub fn output(&self, task_id: &str) -> Option<&Value> {
        self.results.get(task_id).and_then(|r| r.value())
    }

    /// Error message of a failed task.
    pub fn error(&self, task_id: &str) -> Option<&str> {
        match self.results.get(task_id).map(|r| &r.outcome) {
            Some(Outcome::Error(detail)) => Some(detail.message.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_report_accessors() {
        let report = RunReport {
            run: RunContext::new("wf", Utc::now()),
            results: HashMap::from([
                ("ok".to_string(), TaskResponse::output(&json!({"total": 1}))),
                ("bad".to_string(), TaskResponse::error(500, "boom")),
            ]),
            failed: vec!["bad".to_string()],
            skipped: vec![],
            duration: Duration::from_millis(5),
        };

        assert!(!report.is_success());
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.output("ok"), Some(&json!({"total": 1})));
        assert_eq!(report.error("bad"), Some("boom"));
        assert_eq!(report.output("bad"), None);
        assert_eq!(report.error("missing"), None);
    }
}
