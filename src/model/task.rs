use chrono::NaiveDate;
use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a task.
pub type TaskId = Uuid;

/// Represents the type of dependency between two tasks.
///
/// The first word names the upstream boundary, the second the downstream
/// boundary that must not precede it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
    #[default]
    FinishToStart,
    StartToStart,
    FinishToFinish,
    StartToFinish,
}

impl DependencyKind {
    pub const ALL: [DependencyKind; 4] = [
        DependencyKind::FinishToStart,
        DependencyKind::StartToStart,
        DependencyKind::FinishToFinish,
        DependencyKind::StartToFinish,
    ];

    /// Short label used in the toolbar and tooltips.
    pub fn short_label(self) -> &'static str {
        match self {
            DependencyKind::FinishToStart => "FS",
            DependencyKind::StartToStart => "SS",
            DependencyKind::FinishToFinish => "FF",
            DependencyKind::StartToFinish => "SF",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DependencyKind::FinishToStart => "Finish → Start",
            DependencyKind::StartToStart => "Start → Start",
            DependencyKind::FinishToFinish => "Finish → Finish",
            DependencyKind::StartToFinish => "Start → Finish",
        }
    }

    /// True if the constraint is anchored on the upstream task's finish.
    pub fn from_finish(self) -> bool {
        matches!(self, DependencyKind::FinishToStart | DependencyKind::FinishToFinish)
    }

    /// True if the constraint is anchored on the downstream task's finish.
    pub fn to_finish(self) -> bool {
        matches!(self, DependencyKind::FinishToFinish | DependencyKind::StartToFinish)
    }
}

/// A dependency link between two tasks. `from_task` is the predecessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub from_task: TaskId,
    pub to_task: TaskId,
    #[serde(default)]
    pub kind: DependencyKind,
}

impl Dependency {
    pub fn new(from_task: TaskId, to_task: TaskId, kind: DependencyKind) -> Self {
        Self {
            from_task,
            to_task,
            kind,
        }
    }
}

/// A single schedulable task in the Gantt chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub start: NaiveDate,
    /// Inclusive last day.
    pub end: NaiveDate,
    /// Progress from 0.0 (not started) to 1.0 (complete).
    #[serde(default)]
    pub progress: f32,
    /// Optional group/category name for organizing tasks.
    #[serde(default)]
    pub group: Option<String>,
    /// Display color for the task bar (stored as RGBA).
    #[serde(with = "color_serde", default = "default_color")]
    pub color: Color32,
}

fn default_color() -> Color32 {
    Color32::from_rgb(70, 130, 180) // Steel blue
}

impl Task {
    /// Create a new task with sensible defaults.
    pub fn new(name: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start,
            end,
            progress: 0.0,
            group: None,
            color: default_color(),
        }
    }

    pub fn with_progress(mut self, progress: f32) -> Self {
        self.progress = progress.clamp(0.0, 1.0);
        self
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// False when the end date precedes the start date.
    pub fn has_valid_range(&self) -> bool {
        self.end >= self.start
    }
}

/// Serde helper for `Color32`.
mod color_serde {
    use egui::Color32;
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        color.to_array().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [r, g, b, a]: [u8; 4] = Deserialize::deserialize(deserializer)?;
        Ok(Color32::from_rgba_premultiplied(r, g, b, a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_dependency_kind_defaults_to_finish_to_start() {
        assert_eq!(DependencyKind::default(), DependencyKind::FinishToStart);
        let dep: Dependency = serde_json::from_str(&format!(
            r#"{{"from_task":"{}","to_task":"{}"}}"#,
            Uuid::nil(),
            Uuid::nil()
        ))
        .unwrap();
        assert_eq!(dep.kind, DependencyKind::FinishToStart);
    }

    #[test]
    fn test_task_json_keeps_color() {
        let task = Task::new("Paint", day(1), day(4)).with_color(Color32::from_rgb(1, 2, 3));
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("[1,2,3,255]"));
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_progress_is_clamped() {
        let task = Task::new("Over", day(1), day(2)).with_progress(1.7);
        assert_eq!(task.progress, 1.0);
    }

    #[test]
    fn test_reversed_range_is_flagged() {
        assert!(Task::new("Ok", day(2), day(2)).has_valid_range());
        assert!(!Task::new("Bad", day(5), day(2)).has_valid_range());
    }
}
