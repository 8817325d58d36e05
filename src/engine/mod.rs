//! The dependency engine: pure queries over a task/edge set plus the
//! transient drag state used to create edges.

pub mod conflict;
pub mod geometry;
pub mod graph;
pub mod interaction;

pub use conflict::{detect_conflicts, Conflicts, Violation};
pub use geometry::{position, BarPosition, RowLayout};
pub use graph::{check_link, has_cycle, DependencyGraph};
pub use interaction::{
    delete_edge, hovered_edge, DependencyListener, DragOutcome, DragState, EdgeInteractionController,
    EdgeScene, PointerEvent,
};
