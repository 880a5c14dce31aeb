use crate::config::TaskConfig;

/// A type-safe wrapper for workflow entry points - tasks with no dependencies.
///
/// Entry points run as soon as a workflow run starts. In the notification
/// workflow, `detectar_incidentes_criticos` is the single entry point.
///
/// # Examples
///
/// ```
/// use alerta_flows::config::EntryPoints;
///
/// let mut entry_points = EntryPoints::new();
/// entry_points.add("obtener_incidentes_pendientes".to_string());
///
/// let ids: Vec<String> = entry_points.into();
/// assert_eq!(ids, vec!["obtener_incidentes_pendientes".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EntryPoints(pub Vec<String>);

impl EntryPoints {
    /// Create a new empty entrypoints list
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Tasks of a workflow that declare no dependencies, in declaration order.
    pub fn from_tasks(tasks: &[TaskConfig]) -> Self {
        Self(
            tasks
                .iter()
                .filter(|t| t.depends_on.is_empty())
                .map(|t| t.id.clone())
                .collect(),
        )
    }

    /// Add an entrypoint
    pub fn add(&mut self, task_id: String) {
        self.0.push(task_id);
    }

    /// Get iterator over entrypoints
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

impl From<Vec<String>> for EntryPoints {
    fn from(entrypoints: Vec<String>) -> Self {
        Self(entrypoints)
    }
}

impl From<EntryPoints> for Vec<String> {
    fn from(value: EntryPoints) -> Self {
        value.0
    }
}
