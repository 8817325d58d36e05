//! Drag-to-connect state machine and edge hover/delete helpers.
//!
//! The controller only knows pointer positions in chart-local coordinates and
//! task ids; turning UI input into [`PointerEvent`]s is the visualizer's job.

use egui::Pos2;
use tracing::{debug, info, warn};

use crate::engine::geometry::{distance_to_path, RowLayout};
use crate::engine::graph::check_link;
use crate::error::Error;
use crate::model::{Dependency, DependencyKind, Task, TaskId};

/// Upward notifications about committed edge edits.
pub trait DependencyListener {
    fn on_dependency_create(&mut self, dependency: &Dependency);
    fn on_dependency_delete(&mut self, from: TaskId, to: TaskId);
}

/// Transient drag state. Nothing here survives a pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: TaskId,
        /// Where the drag began; start of the provisional edge.
        anchor: Pos2,
        /// Latest pointer position; end of the provisional edge.
        cursor: Pos2,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Pointer pressed on a task's connection handle.
    Down { source: TaskId, pos: Pos2 },
    Move { pos: Pos2 },
    Up { pos: Pos2 },
}

/// What a single transition did.
#[derive(Debug)]
pub enum DragOutcome {
    /// Event had no meaning in the current state.
    Ignored,
    Started,
    Previewed,
    /// Released with no usable target; the edge list is untouched.
    Discarded,
    /// Released on a valid target but the edge was refused.
    Rejected(Error),
    Created(Dependency),
}

/// Everything a pointer-up needs to resolve and commit an edge.
pub struct EdgeScene<'a> {
    pub rows: &'a RowLayout,
    /// Tasks in row order.
    pub tasks: &'a [Task],
    pub edges: &'a mut Vec<Dependency>,
    pub listener: &'a mut dyn DependencyListener,
}

#[derive(Debug, Clone, Default)]
pub struct EdgeInteractionController {
    state: DragState,
    kind: DependencyKind,
}

impl EdgeInteractionController {
    pub fn new(kind: DependencyKind) -> Self {
        Self {
            state: DragState::Idle,
            kind,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Kind given to edges created by dragging.
    pub fn kind(&self) -> DependencyKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: DependencyKind) {
        self.kind = kind;
    }

    /// Source task and the two ends of the preview line while dragging.
    pub fn provisional_edge(&self) -> Option<(TaskId, Pos2, Pos2)> {
        match self.state {
            DragState::Dragging {
                source,
                anchor,
                cursor,
            } => Some((source, anchor, cursor)),
            DragState::Idle => None,
        }
    }

    /// Apply one pointer event. Only `Up` ever touches the scene.
    pub fn handle(&mut self, event: PointerEvent, scene: &mut EdgeScene<'_>) -> DragOutcome {
        let state = std::mem::take(&mut self.state);
        match (state, event) {
            (_, PointerEvent::Down { source, pos }) => {
                debug!(%source, "connection drag started");
                self.state = DragState::Dragging {
                    source,
                    anchor: pos,
                    cursor: pos,
                };
                DragOutcome::Started
            }
            (DragState::Dragging { source, anchor, .. }, PointerEvent::Move { pos }) => {
                self.state = DragState::Dragging {
                    source,
                    anchor,
                    cursor: pos,
                };
                DragOutcome::Previewed
            }
            (DragState::Dragging { source, .. }, PointerEvent::Up { pos }) => {
                self.release(source, pos, scene)
            }
            (DragState::Idle, _) => DragOutcome::Ignored,
        }
    }

    /// Resolve the drop target and commit the edge if it keeps the graph acyclic.
    fn release(&self, source: TaskId, pos: Pos2, scene: &mut EdgeScene<'_>) -> DragOutcome {
        let Some(row) = scene.rows.row_at(pos.y, scene.tasks.len()) else {
            debug!(%source, "connection dropped outside any row");
            return DragOutcome::Discarded;
        };
        let target = scene.tasks[row].id;
        if target == source {
            debug!(%source, "connection dropped on its own row");
            return DragOutcome::Discarded;
        }
        if !scene.tasks.iter().any(|t| t.id == source) {
            debug!(%source, "connection source is no longer loaded");
            return DragOutcome::Discarded;
        }

        if let Err(err) = check_link(scene.edges.as_slice(), source, target) {
            warn!(from = %source, to = %target, "{err}");
            return DragOutcome::Rejected(err);
        }

        let dependency = Dependency::new(source, target, self.kind);
        scene.edges.push(dependency.clone());
        info!(from = %source, to = %target, kind = ?self.kind, "dependency created");
        scene.listener.on_dependency_create(&dependency);
        DragOutcome::Created(dependency)
    }
}

/// Index of the edge path closest to `point`, if within `tolerance`.
///
/// `paths` pairs an edge index with its rendered polyline.
pub fn hovered_edge(point: Pos2, paths: &[(usize, Vec<Pos2>)], tolerance: f32) -> Option<usize> {
    paths
        .iter()
        .map(|(index, path)| (*index, distance_to_path(point, path)))
        .filter(|(_, dist)| *dist <= tolerance)
        // Ties go to the first path so repeated calls agree.
        .fold(None, |best: Option<(usize, f32)>, (index, dist)| match best {
            Some((_, best_dist)) if best_dist <= dist => best,
            _ => Some((index, dist)),
        })
        .map(|(index, _)| index)
}

/// Remove one edge by index and tell the listener.
pub fn delete_edge(
    edges: &mut Vec<Dependency>,
    index: usize,
    listener: &mut dyn DependencyListener,
) -> Option<Dependency> {
    if index >= edges.len() {
        return None;
    }
    let removed = edges.remove(index);
    info!(from = %removed.from_task, to = %removed.to_task, "dependency deleted");
    listener.on_dependency_delete(removed.from_task, removed.to_task);
    Some(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use egui::pos2;

    #[derive(Default)]
    struct Recorder {
        created: Vec<Dependency>,
        deleted: Vec<(TaskId, TaskId)>,
    }

    impl DependencyListener for Recorder {
        fn on_dependency_create(&mut self, dependency: &Dependency) {
            self.created.push(dependency.clone());
        }

        fn on_dependency_delete(&mut self, from: TaskId, to: TaskId) {
            self.deleted.push((from, to));
        }
    }

    const ROWS: RowLayout = RowLayout {
        header_height: 40.0,
        row_height: 30.0,
        row_gap: 2.0,
        bar_inset: 3.0,
    };

    fn tasks() -> Vec<Task> {
        let d = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        vec![Task::new("A", d, d), Task::new("B", d, d), Task::new("C", d, d)]
    }

    fn row_y(row: usize) -> f32 {
        ROWS.row_top(row) + ROWS.pitch() / 2.0
    }

    #[test]
    fn test_drag_and_drop_creates_edge() {
        let tasks = tasks();
        let mut edges = Vec::new();
        let mut recorder = Recorder::default();
        let mut controller = EdgeInteractionController::new(DependencyKind::StartToStart);

        let mut scene = EdgeScene {
            rows: &ROWS,
            tasks: &tasks,
            edges: &mut edges,
            listener: &mut recorder,
        };
        let down = PointerEvent::Down {
            source: tasks[0].id,
            pos: pos2(50.0, row_y(0)),
        };
        assert!(matches!(controller.handle(down, &mut scene), DragOutcome::Started));
        assert!(matches!(
            controller.handle(PointerEvent::Move { pos: pos2(80.0, row_y(1)) }, &mut scene),
            DragOutcome::Previewed
        ));
        assert_eq!(
            controller.provisional_edge(),
            Some((tasks[0].id, pos2(50.0, row_y(0)), pos2(80.0, row_y(1))))
        );
        assert!(scene.edges.is_empty());

        let outcome = controller.handle(PointerEvent::Up { pos: pos2(90.0, row_y(2)) }, &mut scene);
        let expected = Dependency::new(tasks[0].id, tasks[2].id, DependencyKind::StartToStart);
        assert!(matches!(outcome, DragOutcome::Created(ref dep) if *dep == expected));
        assert_eq!(controller.state(), DragState::Idle);
        assert_eq!(edges, vec![expected.clone()]);
        assert_eq!(recorder.created, vec![expected]);
    }

    #[test]
    fn test_second_down_restarts_drag_from_new_source() {
        let tasks = tasks();
        let mut edges = Vec::new();
        let mut recorder = Recorder::default();
        let mut controller = EdgeInteractionController::default();
        let mut scene = EdgeScene {
            rows: &ROWS,
            tasks: &tasks,
            edges: &mut edges,
            listener: &mut recorder,
        };

        controller.handle(
            PointerEvent::Down {
                source: tasks[0].id,
                pos: pos2(10.0, row_y(0)),
            },
            &mut scene,
        );
        let restarted = controller.handle(
            PointerEvent::Down {
                source: tasks[1].id,
                pos: pos2(20.0, row_y(1)),
            },
            &mut scene,
        );
        assert!(matches!(restarted, DragOutcome::Started));
        assert_eq!(
            controller.provisional_edge(),
            Some((tasks[1].id, pos2(20.0, row_y(1)), pos2(20.0, row_y(1))))
        );

        let outcome = controller.handle(PointerEvent::Up { pos: pos2(30.0, row_y(2)) }, &mut scene);
        let expected = Dependency::new(tasks[1].id, tasks[2].id, DependencyKind::FinishToStart);
        assert!(matches!(outcome, DragOutcome::Created(ref dep) if *dep == expected));
        assert_eq!(edges, vec![expected]);
    }

    #[test]
    fn test_drop_outside_rows_is_discarded() {
        let tasks = tasks();
        let mut edges = Vec::new();
        let mut recorder = Recorder::default();
        let mut controller = EdgeInteractionController::default();
        let mut scene = EdgeScene {
            rows: &ROWS,
            tasks: &tasks,
            edges: &mut edges,
            listener: &mut recorder,
        };

        controller.handle(
            PointerEvent::Down {
                source: tasks[1].id,
                pos: pos2(10.0, row_y(1)),
            },
            &mut scene,
        );
        let below = ROWS.content_height(tasks.len()) + 5.0;
        let outcome = controller.handle(PointerEvent::Up { pos: pos2(10.0, below) }, &mut scene);

        assert!(matches!(outcome, DragOutcome::Discarded));
        assert!(!controller.is_dragging());
        assert!(edges.is_empty());
        assert!(recorder.created.is_empty());
    }

    #[test]
    fn test_drop_on_source_row_is_discarded() {
        let tasks = tasks();
        let mut edges = Vec::new();
        let mut recorder = Recorder::default();
        let mut controller = EdgeInteractionController::default();
        let mut scene = EdgeScene {
            rows: &ROWS,
            tasks: &tasks,
            edges: &mut edges,
            listener: &mut recorder,
        };

        controller.handle(
            PointerEvent::Down {
                source: tasks[0].id,
                pos: pos2(10.0, row_y(0)),
            },
            &mut scene,
        );
        let outcome = controller.handle(PointerEvent::Up { pos: pos2(60.0, row_y(0)) }, &mut scene);

        assert!(matches!(outcome, DragOutcome::Discarded));
        assert!(edges.is_empty());
    }

    #[test]
    fn test_cycle_is_rejected_without_mutation() {
        let tasks = tasks();
        let mut edges = vec![
            Dependency::new(tasks[0].id, tasks[1].id, DependencyKind::FinishToStart),
            Dependency::new(tasks[1].id, tasks[2].id, DependencyKind::FinishToStart),
        ];
        let before = edges.clone();
        let mut recorder = Recorder::default();
        let mut controller = EdgeInteractionController::default();
        let mut scene = EdgeScene {
            rows: &ROWS,
            tasks: &tasks,
            edges: &mut edges,
            listener: &mut recorder,
        };

        controller.handle(
            PointerEvent::Down {
                source: tasks[2].id,
                pos: pos2(10.0, row_y(2)),
            },
            &mut scene,
        );
        let outcome = controller.handle(PointerEvent::Up { pos: pos2(10.0, row_y(0)) }, &mut scene);

        assert!(matches!(outcome, DragOutcome::Rejected(Error::Cycle { .. })));
        assert!(!controller.is_dragging());
        assert_eq!(edges, before);
        assert!(recorder.created.is_empty());
    }

    #[test]
    fn test_events_while_idle_are_ignored() {
        let tasks = tasks();
        let mut edges = Vec::new();
        let mut recorder = Recorder::default();
        let mut controller = EdgeInteractionController::default();
        let mut scene = EdgeScene {
            rows: &ROWS,
            tasks: &tasks,
            edges: &mut edges,
            listener: &mut recorder,
        };

        let mv = controller.handle(PointerEvent::Move { pos: pos2(1.0, 1.0) }, &mut scene);
        let up = controller.handle(PointerEvent::Up { pos: pos2(1.0, row_y(1)) }, &mut scene);

        assert!(matches!(mv, DragOutcome::Ignored));
        assert!(matches!(up, DragOutcome::Ignored));
        assert!(edges.is_empty());
    }

    #[test]
    fn test_unknown_source_is_discarded() {
        let tasks = tasks();
        let mut edges = Vec::new();
        let mut recorder = Recorder::default();
        let mut controller = EdgeInteractionController::default();
        let mut scene = EdgeScene {
            rows: &ROWS,
            tasks: &tasks,
            edges: &mut edges,
            listener: &mut recorder,
        };

        controller.handle(
            PointerEvent::Down {
                source: uuid::Uuid::new_v4(),
                pos: pos2(10.0, row_y(0)),
            },
            &mut scene,
        );
        let outcome = controller.handle(PointerEvent::Up { pos: pos2(10.0, row_y(1)) }, &mut scene);

        assert!(matches!(outcome, DragOutcome::Discarded));
        assert!(edges.is_empty());
    }

    #[test]
    fn test_hovered_edge_picks_nearest_within_tolerance() {
        let paths = vec![
            (0, vec![pos2(0.0, 0.0), pos2(100.0, 0.0)]),
            (3, vec![pos2(0.0, 10.0), pos2(100.0, 10.0)]),
        ];
        assert_eq!(hovered_edge(pos2(50.0, 7.0), &paths, 5.0), Some(3));
        assert_eq!(hovered_edge(pos2(50.0, 2.0), &paths, 5.0), Some(0));
        assert_eq!(hovered_edge(pos2(50.0, 5.0), &paths, 5.0), Some(0));
        assert_eq!(hovered_edge(pos2(50.0, 40.0), &paths, 5.0), None);
    }

    #[test]
    fn test_delete_edge_notifies_listener() {
        let tasks = tasks();
        let mut edges = vec![
            Dependency::new(tasks[0].id, tasks[1].id, DependencyKind::FinishToStart),
            Dependency::new(tasks[0].id, tasks[1].id, DependencyKind::StartToStart),
        ];
        let mut recorder = Recorder::default();

        let removed = delete_edge(&mut edges, 1, &mut recorder);

        assert_eq!(removed.map(|d| d.kind), Some(DependencyKind::StartToStart));
        assert_eq!(edges.len(), 1);
        assert_eq!(recorder.deleted, vec![(tasks[0].id, tasks[1].id)]);
        assert!(delete_edge(&mut edges, 5, &mut recorder).is_none());
        assert_eq!(recorder.deleted.len(), 1);
    }
}
