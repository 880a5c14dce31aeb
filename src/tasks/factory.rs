// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;

use crate::config::consts::DEFAULT_STALE_AFTER_MINUTES;
use crate::config::defaults::task_ids;
use crate::config::TaskConfig;
use crate::services::Services;
use crate::traits::Task;

use super::classification::*;
use super::notification::*;

/// An upstream output a task reads, resolved from its options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRead {
    /// Option key that names the upstream task
    pub option: &'static str,
    pub task_id: String,
    /// The task tolerates a missing output
    pub optional: bool,
}

impl UpstreamRead {
    fn required(config: &TaskConfig, option: &'static str, default: &str) -> Self {
        Self {
            option,
            task_id: upstream(config, option, default),
            optional: false,
        }
    }

    fn optional(config: &TaskConfig, option: &'static str, default: &str) -> Self {
        Self {
            optional: true,
            ..Self::required(config, option, default)
        }
    }
}

/// Factory for the built-in workflow tasks
pub struct TaskFactory;

impl TaskFactory {
    /// Create a task instance from configuration
    ///
    /// The `task` field selects the implementation:
    /// - "fetch_pending" -> FetchPendingTask
    /// - "classify_urgency" -> ClassifyUrgencyTask (`input`)
    /// - "assign_area" -> AssignAreaTask (`input`)
    /// - "update_status" -> UpdateStatusTask (`input`)
    /// - "classification_report" -> ClassificationReportTask (`buckets`, `assignments`, `report_dir`)
    /// - "detect_critical" -> DetectCriticalTask (`stale_after_minutes`)
    /// - "realtime_alert" -> RealtimeAlertTask (`input`)
    /// - "prepare_emails" -> PrepareEmailsTask (`input`)
    /// - "sms_alert" -> SmsAlertTask (`input`)
    /// - "record_notifications" -> RecordNotificationsTask (`input`, `sms`)
    ///
    /// Upstream options name the task whose output is read; they default to the
    /// IDs used by the built-in workflows.
    pub fn create_task(config: &TaskConfig, services: &Services) -> Result<Arc<dyn Task>, String> {
        let input = |default: &str| upstream(config, "input", default);

        match config.task.as_str() {
            // Classification
            "fetch_pending" => Ok(Arc::new(FetchPendingTask::new(services.store.clone()))),
            "classify_urgency" => Ok(Arc::new(ClassifyUrgencyTask::new(input(
                task_ids::FETCH_PENDING,
            )))),
            "assign_area" => Ok(Arc::new(AssignAreaTask::new(
                input(task_ids::CLASSIFY_URGENCY),
                services.routing.clone(),
            ))),
            "update_status" => Ok(Arc::new(UpdateStatusTask::new(
                input(task_ids::ASSIGN_AREA),
                services.api.clone(),
            ))),
            "classification_report" => Ok(Arc::new(ClassificationReportTask::new(
                upstream(config, "buckets", task_ids::CLASSIFY_URGENCY),
                upstream(config, "assignments", task_ids::ASSIGN_AREA),
                config.option_str("report_dir").map(PathBuf::from),
            ))),

            // Notification
            "detect_critical" => Ok(Arc::new(DetectCriticalTask::new(
                services.store.clone(),
                stale_after(config)?,
            ))),
            "realtime_alert" => Ok(Arc::new(RealtimeAlertTask::new(
                input(task_ids::DETECT_CRITICAL),
                services.realtime.clone(),
            ))),
            "prepare_emails" => Ok(Arc::new(PrepareEmailsTask::new(
                input(task_ids::DETECT_CRITICAL),
                services.routing.clone(),
                services.email.dashboard_url.clone(),
            ))),
            "sms_alert" => Ok(Arc::new(SmsAlertTask::new(
                input(task_ids::DETECT_CRITICAL),
                services.sms.clone(),
                services.emergency_contacts.clone(),
            ))),
            "record_notifications" => Ok(Arc::new(RecordNotificationsTask::new(
                input(task_ids::DETECT_CRITICAL),
                upstream(config, "sms", task_ids::SMS),
                services.store.clone(),
            ))),

            _ => Err(format!("Unknown task implementation: '{}'", config.task)),
        }
    }

    /// Upstream outputs the configured task will pull at run time
    pub fn upstream_reads(config: &TaskConfig) -> Vec<UpstreamRead> {
        let input = |default: &str| UpstreamRead::required(config, "input", default);

        match config.task.as_str() {
            "classify_urgency" => vec![input(task_ids::FETCH_PENDING)],
            "assign_area" => vec![input(task_ids::CLASSIFY_URGENCY)],
            "update_status" => vec![input(task_ids::ASSIGN_AREA)],
            "classification_report" => vec![
                UpstreamRead::required(config, "buckets", task_ids::CLASSIFY_URGENCY),
                UpstreamRead::required(config, "assignments", task_ids::ASSIGN_AREA),
            ],
            "realtime_alert" | "prepare_emails" | "sms_alert" => {
                vec![input(task_ids::DETECT_CRITICAL)]
            }
            "record_notifications" => vec![
                input(task_ids::DETECT_CRITICAL),
                UpstreamRead::optional(config, "sms", task_ids::SMS),
            ],
            _ => Vec::new(),
        }
    }

    /// Check option values without building the task
    pub fn validate_options(config: &TaskConfig) -> Result<(), String> {
        match config.task.as_str() {
            "detect_critical" => stale_after(config).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// List all available task implementations
    pub fn list_available_implementations() -> Vec<&'static str> {
        vec![
            "fetch_pending",
            "classify_urgency",
            "assign_area",
            "update_status",
            "classification_report",
            "detect_critical",
            "realtime_alert",
            "prepare_emails",
            "sms_alert",
            "record_notifications",
        ]
    }

    /// Check if an implementation is available
    pub fn is_implementation_available(name: &str) -> bool {
        Self::list_available_implementations().contains(&name)
    }
}

fn upstream(config: &TaskConfig, key: &str, default: &str) -> String {
    config.option_str(key).unwrap_or(default).to_string()
}

fn stale_after(config: &TaskConfig) -> Result<Duration, String> {
    let minutes = match config.options.get("stale_after_minutes") {
        None => DEFAULT_STALE_AFTER_MINUTES,
        Some(_) => config
            .option_i64("stale_after_minutes")
            .filter(|m| *m > 0)
            .ok_or_else(|| {
                format!(
                    "Task '{}': 'stale_after_minutes' must be a positive integer",
                    config.id
                )
            })?,
    };

    Duration::try_minutes(minutes).ok_or_else(|| {
        format!(
            "Task '{}': 'stale_after_minutes' value {} is out of range",
            config.id, minutes
        )
    })
}
