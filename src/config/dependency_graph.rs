use std::collections::HashMap;

use crate::config::TaskConfig;

/// Newtype wrapper for dependency graph providing type safety
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph(pub HashMap<String, Vec<String>>);

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Build the forward graph (task -> [dependents]) from `depends_on` declarations.
    /// Every task gets an entry, even when nothing depends on it.
    pub fn from_tasks(tasks: &[TaskConfig]) -> Self {
        let mut graph: HashMap<String, Vec<String>> = tasks
            .iter()
            .map(|t| (t.id.clone(), Vec::new()))
            .collect();

        for task in tasks {
            for dependency in &task.depends_on {
                graph
                    .entry(dependency.clone())
                    .or_default()
                    .push(task.id.clone());
            }
        }

        Self(graph)
    }

    /// Get dependents for a task
    pub fn get_dependents(&self, task_id: &str) -> Option<&Vec<String>> {
        self.0.get(task_id)
    }

    /// Invert the graph: task -> [tasks it depends on].
    /// Every task that appears anywhere in the graph gets an entry.
    pub fn build_reverse_dependencies(&self) -> HashMap<String, Vec<String>> {
        let mut reverse: HashMap<String, Vec<String>> = HashMap::new();

        for (task_id, dependents) in &self.0 {
            reverse.entry(task_id.clone()).or_default();
            for dependent in dependents {
                reverse
                    .entry(dependent.clone())
                    .or_default()
                    .push(task_id.clone());
            }
        }

        reverse
    }

    /// Get all task IDs in the graph
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}

impl From<HashMap<String, Vec<String>>> for DependencyGraph {
    fn from(graph: HashMap<String, Vec<String>>) -> Self {
        Self(graph)
    }
}

impl From<DependencyGraph> for HashMap<String, Vec<String>> {
    fn from(graph: DependencyGraph) -> Self {
        graph.0
    }
}
