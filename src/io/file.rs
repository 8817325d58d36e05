use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::model::Project;

/// Load a project from a JSON file.
///
/// Data problems the engine tolerates (reversed date ranges, edges to
/// unknown tasks) are logged and kept as is.
pub fn load_project(path: &Path) -> Result<Project> {
    let json = std::fs::read_to_string(path)?;
    let project: Project = serde_json::from_str(&json)?;
    report_data_issues(&project);
    info!(
        path = %path.display(),
        tasks = project.tasks.len(),
        dependencies = project.dependencies.len(),
        "project loaded"
    );
    Ok(project)
}

fn report_data_issues(project: &Project) {
    for task in project.tasks.iter().filter(|t| !t.has_valid_range()) {
        warn!(task = %task.name, start = %task.start, end = %task.end, "task ends before it starts");
    }
    let index = project.task_map();
    for dep in &project.dependencies {
        if !index.contains_key(&dep.from_task) || !index.contains_key(&dep.to_task) {
            warn!(from = %dep.from_task, to = %dep.to_task, "dependency references a missing task");
        }
    }
}
