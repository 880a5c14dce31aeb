// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::consts::{
    DEFAULT_API_BASE_URL, DEFAULT_DASHBOARD_URL, DEFAULT_EMERGENCY_CONTACT,
    DEFAULT_HTTP_TIMEOUT_SECS,
};
use crate::config::defaults::default_workflows;
use crate::errors::{ConfigError, FailureStrategy};
use crate::model::RoutingTable;

/// Main configuration structure for the incident workflows.
///
/// Every section is optional; an empty file yields the two built-in workflows
/// running against an in-memory store with dry-run notification channels.
///
/// # Example
/// ```yaml
/// api:
///   base_url: https://api.example.com/dev
/// realtime:
///   url: wss://ws.example.com/dev
/// sms:
///   emergency_contacts: ["+51999999999"]
/// store:
///   kind: json_file
///   path: data/incidentes.json
/// workflows:
///   - id: clasificar_incidentes
///     schedule_interval_secs: 300
///     retries: 2
///     retry_delay_secs: 120
///     tasks:
///       - id: obtener_incidentes_pendientes
///         task: fetch_pending
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub realtime: RealtimeConfig,
    #[serde(default)]
    pub sms: SmsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub routing: RoutingTable,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default = "default_workflows")]
    pub workflows: Vec<WorkflowConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            realtime: RealtimeConfig::default(),
            sms: SmsConfig::default(),
            store: StoreConfig::default(),
            routing: RoutingTable::default(),
            email: EmailConfig::default(),
            workflows: default_workflows(),
        }
    }
}

impl Config {
    pub fn workflow(&self, id: &str) -> Result<&WorkflowConfig, ConfigError> {
        self.workflows
            .iter()
            .find(|w| w.id == id)
            .ok_or_else(|| ConfigError::UnknownWorkflow(id.to_string()))
    }
}

/// Incident REST API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_seconds: default_http_timeout(),
        }
    }
}

/// WebSocket gateway. Without a URL, alerts are only logged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RealtimeConfig {
    pub url: Option<String>,
}

/// SMS provider. Without an endpoint, messages are only logged.
#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    #[serde(default = "default_emergency_contacts")]
    pub emergency_contacts: Vec<String>,
    pub endpoint: Option<String>,
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            emergency_contacts: default_emergency_contacts(),
            endpoint: None,
            timeout_seconds: default_http_timeout(),
        }
    }
}

/// Where incident documents live.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    #[default]
    Memory,
    JsonFile { path: PathBuf },
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_dashboard_url")]
    pub dashboard_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            dashboard_url: default_dashboard_url(),
        }
    }
}

/// Execution strategy for a workflow run.
///
/// * `Level` - run each topological level concurrently, up to `max_concurrency`
/// * `Sequential` - same ordering, one task at a time
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    #[default]
    Level,
    Sequential,
}

/// Executor-specific configuration options.
///
/// # Fields
/// * `max_concurrency` - Maximum number of concurrent task executions (optional)
/// * `timeout_seconds` - Timeout for a single task attempt in seconds (optional)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutorOptions {
    pub max_concurrency: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

/// One periodic task graph.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub schedule_interval_secs: u64,
    /// Extra attempts per task after the first failure.
    #[serde(default)]
    pub retries: u32,
    #[serde(default)]
    pub retry_delay_secs: u64,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub failure_strategy: FailureStrategy,
    #[serde(default)]
    pub executor_options: ExecutorOptions,
    pub tasks: Vec<TaskConfig>,
}

impl WorkflowConfig {
    pub fn schedule_interval(&self) -> Duration {
        Duration::from_secs(self.schedule_interval_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

/// Configuration for a single task in a workflow graph.
///
/// # Example
/// ```yaml
/// id: "enviar_sms"
/// task: sms_alert
/// depends_on: ["detectar_incidentes_criticos"]
/// options:
///   input: detectar_incidentes_criticos
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    pub id: String,
    /// Implementation name understood by the task factory.
    pub task: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub options: HashMap<String, serde_yaml::Value>,
}

impl TaskConfig {
    pub fn option_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(|v| v.as_str())
    }

    pub fn option_i64(&self, key: &str) -> Option<i64> {
        self.options.get(key).and_then(|v| v.as_i64())
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}

fn default_emergency_contacts() -> Vec<String> {
    vec![DEFAULT_EMERGENCY_CONTACT.to_string()]
}

fn default_dashboard_url() -> String {
    DEFAULT_DASHBOARD_URL.to_string()
}

fn default_enabled() -> bool {
    true
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path_ref = path.as_ref();
    let content = fs::read_to_string(path_ref).map_err(|source| ConfigError::Read {
        path: path_ref.display().to_string(),
        source,
    })?;
    parse_config(&content, &path_ref.display().to_string())
}

fn parse_config(content: &str, origin: &str) -> Result<Config, ConfigError> {
    // serde_yaml rejects an empty document for a struct; treat it as "all defaults".
    if content.trim().is_empty() {
        return Ok(Config::default());
    }
    serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
        path: origin.to_string(),
        source,
    })
}

/// Load and validate a config from a YAML file
///
/// Validation covers every workflow graph: unique IDs, resolvable
/// dependencies, no cycles and known task implementations.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}
