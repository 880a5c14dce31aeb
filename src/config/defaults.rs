// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in definitions of the two incident workflows.

use std::collections::HashMap;

use crate::config::consts::{
    CLASSIFICATION_INTERVAL_SECS, CLASSIFICATION_WORKFLOW_ID, NOTIFICATION_INTERVAL_SECS,
    NOTIFICATION_WORKFLOW_ID,
};
use crate::config::{ExecutorOptions, Strategy, TaskConfig, WorkflowConfig};
use crate::errors::FailureStrategy;

pub mod task_ids {
    pub const FETCH_PENDING: &str = "obtener_incidentes_pendientes";
    pub const CLASSIFY_URGENCY: &str = "clasificar_por_urgencia";
    pub const ASSIGN_AREA: &str = "asignar_area_responsable";
    pub const UPDATE_STATUS: &str = "actualizar_estado";
    pub const REPORT: &str = "generar_reporte";

    pub const DETECT_CRITICAL: &str = "detectar_incidentes_criticos";
    pub const REALTIME: &str = "enviar_websocket";
    pub const PREPARE_EMAILS: &str = "preparar_emails";
    pub const SMS: &str = "enviar_sms";
    pub const RECORD: &str = "registrar_notificaciones";
}

fn task(id: &str, implementation: &str, depends_on: &[&str]) -> TaskConfig {
    TaskConfig {
        id: id.to_string(),
        task: implementation.to_string(),
        depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
        options: HashMap::new(),
    }
}

/// `fetch >> classify >> assign >> update >> report`, every 5 minutes, 2 retries 2 minutes apart.
pub fn classification_workflow() -> WorkflowConfig {
    use task_ids::*;

    WorkflowConfig {
        id: CLASSIFICATION_WORKFLOW_ID.to_string(),
        description: "Clasificación automática de incidentes pendientes".to_string(),
        enabled: true,
        schedule_interval_secs: CLASSIFICATION_INTERVAL_SECS,
        retries: 2,
        retry_delay_secs: 120,
        strategy: Strategy::Level,
        failure_strategy: FailureStrategy::FailFast,
        executor_options: ExecutorOptions::default(),
        tasks: vec![
            task(FETCH_PENDING, "fetch_pending", &[]),
            task(CLASSIFY_URGENCY, "classify_urgency", &[FETCH_PENDING]),
            task(ASSIGN_AREA, "assign_area", &[CLASSIFY_URGENCY]),
            task(UPDATE_STATUS, "update_status", &[ASSIGN_AREA]),
            task(REPORT, "classification_report", &[UPDATE_STATUS]),
        ],
    }
}

/// `detect >> [websocket, emails, sms] >> record`, every 3 minutes, 1 retry after 1 minute.
pub fn notification_workflow() -> WorkflowConfig {
    use task_ids::*;

    WorkflowConfig {
        id: NOTIFICATION_WORKFLOW_ID.to_string(),
        description: "Envío de notificaciones a áreas responsables".to_string(),
        enabled: true,
        schedule_interval_secs: NOTIFICATION_INTERVAL_SECS,
        retries: 1,
        retry_delay_secs: 60,
        strategy: Strategy::Level,
        failure_strategy: FailureStrategy::FailFast,
        executor_options: ExecutorOptions::default(),
        tasks: vec![
            task(DETECT_CRITICAL, "detect_critical", &[]),
            task(REALTIME, "realtime_alert", &[DETECT_CRITICAL]),
            task(PREPARE_EMAILS, "prepare_emails", &[DETECT_CRITICAL]),
            task(SMS, "sms_alert", &[DETECT_CRITICAL]),
            task(RECORD, "record_notifications", &[REALTIME, PREPARE_EMAILS, SMS]),
        ],
    }
}

pub fn default_workflows() -> Vec<WorkflowConfig> {
    vec![classification_workflow(), notification_workflow()]
}
