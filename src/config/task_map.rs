// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::WorkflowConfig;
use crate::errors::ConfigError;
use crate::services::Services;
use crate::tasks::TaskFactory;
use crate::traits::Task;

/// A type-safe registry mapping task IDs to their implementations.
///
/// Tasks are wrapped in `Arc<dyn Task>` so the executor can hand them to
/// spawned futures without cloning the implementation.
///
/// # Examples
///
/// ```ignore
/// use std::sync::Arc;
/// use alerta_flows::config::TaskMap;
///
/// let mut tasks = TaskMap::new();
/// tasks.insert("obtener_incidentes_pendientes".to_string(), Arc::new(fetch_task));
/// assert!(tasks.contains_key("obtener_incidentes_pendientes"));
/// ```
#[derive(Clone, Default)]
pub struct TaskMap(pub HashMap<String, Arc<dyn Task>>);

impl TaskMap {
    /// Create a new empty task map
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Instantiate every task of a workflow against the shared services.
    pub fn from_workflow(workflow: &WorkflowConfig, services: &Services) -> Result<Self, ConfigError> {
        let mut registry = HashMap::new();

        for t in &workflow.tasks {
            let task = TaskFactory::create_task(t, services).map_err(|reason| {
                ConfigError::TaskCreation {
                    task_id: t.id.clone(),
                    reason,
                }
            })?;
            registry.insert(t.id.clone(), task);
        }

        Ok(Self(registry))
    }

    /// Insert a task into the map
    pub fn insert(&mut self, id: String, task: Arc<dyn Task>) {
        self.0.insert(id, task);
    }

    /// Get a task by ID
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Task>> {
        self.0.get(id)
    }

    /// Check if a task exists
    pub fn contains_key(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get all task IDs
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl std::fmt::Debug for TaskMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskMap")
            .field("task_count", &self.0.len())
            .field("task_ids", &self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl From<HashMap<String, Arc<dyn Task>>> for TaskMap {
    fn from(map: HashMap<String, Arc<dyn Task>>) -> Self {
        Self(map)
    }
}
