use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::{Dependency, Task, TaskId};

/// A Gantt project containing tasks, dependencies, and metadata.
///
/// This is the owned state the engine queries operate on. Nothing in the
/// engine keeps a copy of it between recomputations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
            tasks: Vec::new(),
            dependencies: Vec::new(),
            created: Utc::now(),
            modified: Utc::now(),
        }
    }
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Display name of a task, or a shortened id for dangling references.
    pub fn task_name(&self, id: TaskId) -> String {
        self.task(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| id.simple().to_string()[..8].to_string())
    }

    /// Index tasks by id for the lifetime of a single render pass.
    pub fn task_map(&self) -> HashMap<TaskId, &Task> {
        task_map(&self.tasks)
    }

    /// Edges whose endpoints are both present in the task set.
    pub fn live_dependencies(&self) -> impl Iterator<Item = &Dependency> {
        let ids: HashMap<TaskId, &Task> = self.task_map();
        self.dependencies
            .iter()
            .filter(move |d| ids.contains_key(&d.from_task) && ids.contains_key(&d.to_task))
    }

    /// Earliest start and latest end across all tasks.
    pub fn date_span(&self) -> Option<(chrono::NaiveDate, chrono::NaiveDate)> {
        let min = self.tasks.iter().map(|t| t.start.min(t.end)).min()?;
        let max = self.tasks.iter().map(|t| t.end.max(t.start)).max()?;
        Some((min, max))
    }
}

/// Build an id -> task lookup. Later duplicates shadow earlier ones.
pub fn task_map(tasks: &[Task]) -> HashMap<TaskId, &Task> {
    tasks.iter().map(|t| (t.id, t)).collect()
}
