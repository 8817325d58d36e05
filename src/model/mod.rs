pub mod project;
pub mod task;
pub mod timeline;

pub use project::{task_map, Project};
pub use task::{Dependency, DependencyKind, Task, TaskId};
pub use timeline::TimelineViewport;
