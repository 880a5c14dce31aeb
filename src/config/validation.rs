// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration validation for workflow graph integrity.
//!
//! Each workflow goes through the same pipeline:
//!
//! 1. **Shape**: at least one task and a non-zero schedule interval
//! 2. **Uniqueness**: task IDs are unique within the workflow
//! 3. **Implementations**: every `task:` name is known to the task factory
//! 4. **Options**: option values each task checks up front (e.g. `stale_after_minutes`)
//! 5. **References**: every `depends_on` entry names a task of the same workflow
//! 6. **Cycles**: DFS with a recursion stack, reporting the cycle path
//! 7. **Inputs**: every upstream output a task pulls comes from one of its
//!    direct or transitive dependencies
//!
//! Cycle detection only runs when references resolve, and input checks only on
//! an acyclic graph with unique IDs, since both walk it.
//! Errors are accumulated so a single pass reports everything wrong with a file.

use std::collections::{HashMap, HashSet};

use crate::config::{Config, WorkflowConfig};
use crate::errors::ValidationError;
use crate::observability::messages::validation::{
    ValidationCompleted, ValidationFailed, ValidationIssue, ValidationStarted,
};
use crate::observability::messages::StructuredLog;
use crate::tasks::TaskFactory;

/// Validate every workflow in the configuration.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    ValidationStarted {
        workflow_count: config.workflows.len(),
    }
    .log();

    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for workflow in &config.workflows {
        if !seen.insert(&workflow.id) {
            errors.push(ValidationError::DuplicateWorkflowId {
                workflow_id: workflow.id.clone(),
            });
        }
    }

    for workflow in &config.workflows {
        if let Err(workflow_errors) = validate_workflow(workflow) {
            errors.extend(workflow_errors);
        }
    }

    if errors.is_empty() {
        ValidationCompleted {
            workflow_count: config.workflows.len(),
        }
        .log();
        Ok(())
    } else {
        for error in &errors {
            ValidationIssue { error }.log();
        }
        ValidationFailed {
            error_count: errors.len(),
        }
        .log();
        Err(errors)
    }
}

/// Validate one workflow's shape and dependency graph.
pub fn validate_workflow(workflow: &WorkflowConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if workflow.tasks.is_empty() {
        errors.push(ValidationError::EmptyWorkflow {
            workflow_id: workflow.id.clone(),
        });
    }

    if workflow.schedule_interval_secs == 0 {
        errors.push(ValidationError::ZeroScheduleInterval {
            workflow_id: workflow.id.clone(),
        });
    }

    let duplicates = validate_unique_task_ids(workflow);
    let ids_unique = duplicates.is_empty();
    errors.extend(duplicates);
    errors.extend(validate_task_implementations(workflow));
    errors.extend(validate_task_options(workflow));

    let unresolved = validate_dependency_references(workflow);
    let references_ok = unresolved.is_empty();
    errors.extend(unresolved);

    if references_ok {
        match find_cycle(workflow) {
            Some(cycle) => errors.push(ValidationError::CyclicDependency {
                workflow_id: workflow.id.clone(),
                cycle,
            }),
            None if ids_unique => errors.extend(validate_upstream_reads(workflow)),
            None => {}
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_unique_task_ids(workflow: &WorkflowConfig) -> Vec<ValidationError> {
    let mut seen_ids = HashSet::new();
    workflow
        .tasks
        .iter()
        .filter(|t| !seen_ids.insert(&t.id))
        .map(|t| ValidationError::DuplicateTaskId {
            workflow_id: workflow.id.clone(),
            task_id: t.id.clone(),
        })
        .collect()
}

fn validate_task_implementations(workflow: &WorkflowConfig) -> Vec<ValidationError> {
    workflow
        .tasks
        .iter()
        .filter(|t| !TaskFactory::is_implementation_available(&t.task))
        .map(|t| ValidationError::UnknownTask {
            workflow_id: workflow.id.clone(),
            task_id: t.id.clone(),
            task: t.task.clone(),
        })
        .collect()
}

fn validate_task_options(workflow: &WorkflowConfig) -> Vec<ValidationError> {
    workflow
        .tasks
        .iter()
        .filter_map(|t| {
            TaskFactory::validate_options(t)
                .err()
                .map(|reason| ValidationError::InvalidTaskOption {
                    workflow_id: workflow.id.clone(),
                    task_id: t.id.clone(),
                    reason,
                })
        })
        .collect()
}

/// An optional read is only checked when it is configured explicitly or the
/// task it defaults to is part of the workflow.
fn validate_upstream_reads(workflow: &WorkflowConfig) -> Vec<ValidationError> {
    let task_ids: HashSet<&str> = workflow.tasks.iter().map(|t| t.id.as_str()).collect();
    let mut errors = Vec::new();

    for task in &workflow.tasks {
        let ancestors = ancestors_of(workflow, &task.id);

        for read in TaskFactory::upstream_reads(task) {
            let explicit = task.options.contains_key(read.option);
            if read.optional && !explicit && !task_ids.contains(read.task_id.as_str()) {
                continue;
            }
            if !ancestors.contains(read.task_id.as_str()) {
                errors.push(ValidationError::UnreachableInput {
                    workflow_id: workflow.id.clone(),
                    task_id: task.id.clone(),
                    option: read.option.to_string(),
                    input: read.task_id,
                });
            }
        }
    }

    errors
}

/// Every task reachable by following `depends_on` from `task_id`.
fn ancestors_of<'a>(workflow: &'a WorkflowConfig, task_id: &str) -> HashSet<&'a str> {
    let by_id: HashMap<&str, &Vec<String>> = workflow
        .tasks
        .iter()
        .map(|t| (t.id.as_str(), &t.depends_on))
        .collect();

    let mut ancestors = HashSet::new();
    let mut stack: Vec<&str> = by_id
        .get(task_id)
        .copied()
        .map(|deps| deps.iter().map(String::as_str).collect())
        .unwrap_or_default();

    while let Some(id) = stack.pop() {
        if let Some((&known, &deps)) = by_id.get_key_value(id) {
            if ancestors.insert(known) {
                stack.extend(deps.iter().map(String::as_str));
            }
        }
    }

    ancestors
}

fn validate_dependency_references(workflow: &WorkflowConfig) -> Vec<ValidationError> {
    let task_ids: HashSet<&String> = workflow.tasks.iter().map(|t| &t.id).collect();
    let mut errors = Vec::new();

    for task in &workflow.tasks {
        for dependency in &task.depends_on {
            if !task_ids.contains(dependency) {
                errors.push(ValidationError::UnresolvedDependency {
                    workflow_id: workflow.id.clone(),
                    task_id: task.id.clone(),
                    missing_dependency: dependency.clone(),
                });
            }
        }
    }

    errors
}

/// DFS over the forward graph (dependency -> dependents). Returns the first
/// cycle found, closed with its starting node, e.g. `[a, b, a]`.
fn find_cycle(workflow: &WorkflowConfig) -> Option<Vec<String>> {
    let mut graph: HashMap<&str, Vec<&str>> = HashMap::new();
    for task in &workflow.tasks {
        graph.entry(task.id.as_str()).or_default();
    }
    for task in &workflow.tasks {
        for dependency in &task.depends_on {
            graph
                .entry(dependency.as_str())
                .or_default()
                .push(task.id.as_str());
        }
    }

    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    // Declaration order keeps the reported cycle stable between runs.
    for task in &workflow.tasks {
        if !visited.contains(task.id.as_str()) {
            if let Some(cycle) =
                dfs_cycle_detection(&task.id, &graph, &mut visited, &mut rec_stack, &mut path)
            {
                return Some(cycle);
            }
        }
    }

    None
}

fn dfs_cycle_detection<'a>(
    node: &'a str,
    graph: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
) -> Option<Vec<String>> {
    visited.insert(node);
    rec_stack.insert(node);
    path.push(node);

    if let Some(neighbors) = graph.get(node) {
        for &neighbor in neighbors {
            if !visited.contains(neighbor) {
                if let Some(cycle) = dfs_cycle_detection(neighbor, graph, visited, rec_stack, path)
                {
                    return Some(cycle);
                }
            } else if rec_stack.contains(neighbor) {
                let cycle_start = path.iter().position(|x| *x == neighbor).unwrap_or(0);
                let mut cycle: Vec<String> =
                    path[cycle_start..].iter().map(|s| s.to_string()).collect();
                cycle.push(neighbor.to_string());
                return Some(cycle);
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::{classification_workflow, notification_workflow};
    use crate::config::TaskConfig;

    fn task(id: &str, implementation: &str, depends_on: &[&str]) -> TaskConfig {
        TaskConfig {
            id: id.to_string(),
            task: implementation.to_string(),
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
            options: HashMap::new(),
        }
    }

    fn workflow(tasks: Vec<TaskConfig>) -> WorkflowConfig {
        let mut wf = classification_workflow();
        wf.id = "test".to_string();
        wf.tasks = tasks;
        wf
    }

    #[test]
    fn test_builtin_workflows_are_valid() {
        assert!(validate_workflow(&classification_workflow()).is_ok());
        assert!(validate_workflow(&notification_workflow()).is_ok());
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_duplicate_task_id() {
        let wf = workflow(vec![
            task("a", "fetch_pending", &[]),
            task("a", "classify_urgency", &[]),
        ]);

        let errors = validate_workflow(&wf).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateTaskId {
                workflow_id: "test".into(),
                task_id: "a".into()
            }]
        );
    }

    #[test]
    fn test_unknown_implementation() {
        let wf = workflow(vec![task("a", "reverse_text", &[])]);

        let errors = validate_workflow(&wf).unwrap_err();
        assert!(matches!(
            &errors[0],
            ValidationError::UnknownTask { task, .. } if task == "reverse_text"
        ));
    }

    #[test]
    fn test_unresolved_dependency_skips_cycle_check() {
        let wf = workflow(vec![
            task("a", "fetch_pending", &["ghost"]),
            task("b", "classify_urgency", &["a"]),
        ]);

        let errors = validate_workflow(&wf).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .to_string()
            .contains("task 'a' depends on 'ghost' which does not exist"));
    }

    #[test]
    fn test_cycle_path_is_reported() {
        let wf = workflow(vec![
            task("entry", "fetch_pending", &[]),
            task("a", "classify_urgency", &["entry", "c"]),
            task("b", "assign_area", &["a"]),
            task("c", "update_status", &["b"]),
        ]);

        let errors = validate_workflow(&wf).unwrap_err();
        match &errors[0] {
            ValidationError::CyclicDependency { cycle, .. } => {
                assert_eq!(cycle, &vec!["a", "b", "c", "a"]);
            }
            other => panic!("expected cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_self_dependency() {
        let wf = workflow(vec![task("a", "fetch_pending", &["a"])]);
        let errors = validate_workflow(&wf).unwrap_err();
        assert!(matches!(
            &errors[0],
            ValidationError::CyclicDependency { cycle, .. } if cycle == &vec!["a".to_string(), "a".to_string()]
        ));
    }

    #[test]
    fn test_zero_interval_and_empty_workflow() {
        let mut wf = workflow(vec![]);
        wf.schedule_interval_secs = 0;

        let errors = validate_workflow(&wf).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_custom_ids_must_name_their_inputs() {
        let wf = workflow(vec![
            task("fetch", "fetch_pending", &[]),
            task("classify", "classify_urgency", &["fetch"]),
        ]);

        let errors = validate_workflow(&wf).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnreachableInput {
                workflow_id: "test".into(),
                task_id: "classify".into(),
                option: "input".into(),
                input: "obtener_incidentes_pendientes".into(),
            }]
        );

        let mut classify = task("classify", "classify_urgency", &["fetch"]);
        classify
            .options
            .insert("input".into(), serde_yaml::Value::from("fetch"));
        let wf = workflow(vec![task("fetch", "fetch_pending", &[]), classify]);
        assert!(validate_workflow(&wf).is_ok());
    }

    #[test]
    fn test_inputs_may_come_from_transitive_dependencies() {
        let mut report = task("report", "classification_report", &["update"]);
        for (key, value) in [("buckets", "classify"), ("assignments", "assign")] {
            report.options.insert(key.into(), serde_yaml::Value::from(value));
        }
        let mut classify = task("classify", "classify_urgency", &["fetch"]);
        classify.options.insert("input".into(), serde_yaml::Value::from("fetch"));
        let mut assign = task("assign", "assign_area", &["classify"]);
        assign.options.insert("input".into(), serde_yaml::Value::from("classify"));
        let mut update = task("update", "update_status", &["assign"]);
        update.options.insert("input".into(), serde_yaml::Value::from("assign"));

        let wf = workflow(vec![
            task("fetch", "fetch_pending", &[]),
            classify,
            assign,
            update,
            report,
        ]);
        assert!(validate_workflow(&wf).is_ok());
    }

    #[test]
    fn test_sibling_output_is_not_an_input() {
        let mut prepare = task("prepare", "prepare_emails", &["detect"]);
        prepare.options.insert("input".into(), serde_yaml::Value::from("sms"));
        let mut sms = task("sms", "sms_alert", &["detect"]);
        sms.options.insert("input".into(), serde_yaml::Value::from("detect"));

        let wf = workflow(vec![task("detect", "detect_critical", &[]), sms, prepare]);
        let errors = validate_workflow(&wf).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .to_string()
            .contains("task 'prepare' reads 'sms' through 'input'"));
    }

    #[test]
    fn test_optional_sms_read_is_checked_only_when_present() {
        let mut record = task("record", "record_notifications", &["detect"]);
        record.options.insert("input".into(), serde_yaml::Value::from("detect"));
        let wf = workflow(vec![task("detect", "detect_critical", &[]), record.clone()]);
        assert!(validate_workflow(&wf).is_ok());

        // The default SMS task exists but record does not wait for it.
        let mut sms = task("enviar_sms", "sms_alert", &["detect"]);
        sms.options.insert("input".into(), serde_yaml::Value::from("detect"));
        let wf = workflow(vec![task("detect", "detect_critical", &[]), sms, record]);
        let errors = validate_workflow(&wf).unwrap_err();
        assert!(matches!(
            &errors[0],
            ValidationError::UnreachableInput { option, .. } if option == "sms"
        ));
    }

    #[test]
    fn test_out_of_range_stale_threshold_is_rejected() {
        let mut detect = task("detect", "detect_critical", &[]);
        detect.options.insert(
            "stale_after_minutes".into(),
            serde_yaml::Value::from(i64::MAX),
        );

        let errors = validate_workflow(&workflow(vec![detect])).unwrap_err();
        assert!(matches!(
            &errors[0],
            ValidationError::InvalidTaskOption { task_id, reason, .. }
                if task_id == "detect" && reason.contains("out of range")
        ));
    }

    #[test]
    fn test_duplicate_workflow_ids() {
        let config = Config {
            workflows: vec![classification_workflow(), classification_workflow()],
            ..Config::default()
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateWorkflowId {
                workflow_id: "clasificar_incidentes".into()
            }]
        );
    }
}
