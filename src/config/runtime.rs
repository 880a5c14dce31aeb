// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};

use crate::config::{Config, DependencyGraph, EntryPoints, TaskMap, WorkflowConfig};
use crate::engine::factory::ExecutorFactory;
use crate::engine::{RunContext, RunReport};
use crate::errors::{ConfigError, ExecutionError, FailureStrategy};
use crate::observability::messages::engine::ExecutionFailed;
use crate::observability::messages::StructuredLog;
use crate::services::Services;
use crate::traits::DagExecutor;

/// One workflow, fully wired: task instances, graph, executor and failure strategy.
///
/// A runtime is built once and run many times; each [`run_once`](Self::run_once)
/// gets a fresh run ID and its own output exchange.
pub struct WorkflowRuntime {
    workflow_id: String,
    tasks: TaskMap,
    graph: DependencyGraph,
    entrypoints: EntryPoints,
    executor: Box<dyn DagExecutor>,
    failure_strategy: FailureStrategy,
}

impl WorkflowRuntime {
    pub fn workflow_id(&self) -> &str {
        &self.workflow_id
    }

    pub fn failure_strategy(&self) -> FailureStrategy {
        self.failure_strategy
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Execute the whole graph once, with `logical_time` as "now" for every task.
    pub async fn run_once(&self, logical_time: DateTime<Utc>) -> Result<RunReport, ExecutionError> {
        let run = RunContext::new(self.workflow_id.clone(), logical_time);
        let run_id = run.run_id.clone();

        let result = self
            .executor
            .execute_with_strategy(
                self.tasks.clone(),
                self.graph.clone(),
                self.entrypoints.clone(),
                run,
                self.failure_strategy,
            )
            .await;

        if let Err(e) = &result {
            ExecutionFailed {
                workflow_id: &self.workflow_id,
                run_id: &run_id,
                error: e,
            }
            .log();
        }

        result
    }
}

/// Workflow runtime builder - orchestrates task map and executor creation from configuration.
///
/// # Examples
///
/// ```no_run
/// use alerta_flows::config::{Config, RuntimeBuilder};
/// use alerta_flows::services::Services;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let services = Services::from_config(&config)?;
/// let runtimes = RuntimeBuilder::from_config(&config, &services)?;
///
/// for runtime in &runtimes {
///     let report = runtime.run_once(chrono::Utc::now()).await?;
///     println!("{}: {} tasks succeeded", runtime.workflow_id(), report.succeeded());
/// }
/// # Ok(())
/// # }
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build the runtime of a single workflow.
    pub fn from_workflow(
        workflow: &WorkflowConfig,
        services: &Services,
    ) -> Result<WorkflowRuntime, ConfigError> {
        let tasks = TaskMap::from_workflow(workflow, services)?;
        let graph = DependencyGraph::from_tasks(&workflow.tasks);
        let entrypoints = EntryPoints::from_tasks(&workflow.tasks);
        let executor = ExecutorFactory::from_workflow(workflow);

        Ok(WorkflowRuntime {
            workflow_id: workflow.id.clone(),
            tasks,
            graph,
            entrypoints,
            executor,
            failure_strategy: workflow.failure_strategy,
        })
    }

    /// Build runtimes for every enabled workflow, in configuration order.
    pub fn from_config(
        cfg: &Config,
        services: &Services,
    ) -> Result<Vec<WorkflowRuntime>, ConfigError> {
        cfg.workflows
            .iter()
            .filter(|w| w.enabled)
            .map(|w| Self::from_workflow(w, services))
            .collect()
    }
}
