//! Scheduling-conflict detection.
//!
//! Each edge is checked on its own against the current dates of its two
//! tasks; there is no propagation through the graph, so this is safe on any
//! edge list, cyclic or not.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::model::{task_map, Dependency, DependencyKind, Task, TaskId};

/// One violated dependency, explained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub from: TaskId,
    pub to: TaskId,
    pub kind: DependencyKind,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Violations grouped by downstream task, in edge evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conflicts {
    by_task: BTreeMap<TaskId, Vec<Violation>>,
}

impl Conflicts {
    pub fn is_empty(&self) -> bool {
        self.by_task.is_empty()
    }

    /// Total number of violations across all tasks.
    pub fn len(&self) -> usize {
        self.by_task.values().map(Vec::len).sum()
    }

    pub fn is_conflicted(&self, id: TaskId) -> bool {
        self.by_task.contains_key(&id)
    }

    pub fn for_task(&self, id: TaskId) -> &[Violation] {
        self.by_task.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn messages_for(&self, id: TaskId) -> Vec<&str> {
        self.for_task(id).iter().map(|v| v.message.as_str()).collect()
    }

    /// Whether this particular edge is among the violations.
    pub fn edge_violated(&self, dep: &Dependency) -> bool {
        self.for_task(dep.to_task)
            .iter()
            .any(|v| v.from == dep.from_task && v.kind == dep.kind)
    }

    fn push(&mut self, violation: Violation) {
        self.by_task.entry(violation.to).or_default().push(violation);
    }
}

/// Evaluate every edge and collect the ones whose constraint is broken.
pub fn detect_conflicts(tasks: &[Task], edges: &[Dependency]) -> Conflicts {
    let index = task_map(tasks);
    let mut conflicts = Conflicts::default();

    for dep in edges {
        if let Some(violation) = check_edge(&index, dep) {
            conflicts.push(violation);
        }
    }

    tracing::debug!(
        edges = edges.len(),
        violations = conflicts.len(),
        "conflict detection pass"
    );
    conflicts
}

/// Check a single edge. Dangling edges are never violated.
pub fn check_edge(index: &HashMap<TaskId, &Task>, dep: &Dependency) -> Option<Violation> {
    let from = index.get(&dep.from_task)?;
    let to = index.get(&dep.to_task)?;

    let (violated, to_verb, from_verb) = match dep.kind {
        DependencyKind::FinishToStart => (to.start < from.end, "starts", "finishes"),
        DependencyKind::StartToStart => (to.start < from.start, "starts", "starts"),
        DependencyKind::FinishToFinish => (to.end < from.end, "finishes", "finishes"),
        DependencyKind::StartToFinish => (to.end < from.start, "finishes", "starts"),
    };
    if !violated {
        return None;
    }

    Some(Violation {
        from: from.id,
        to: to.id,
        kind: dep.kind,
        message: format!("'{}' {} before '{}' {}", to.name, to_verb, from.name, from_verb),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn day(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap() + chrono::Duration::days(n)
    }

    fn task(name: &str, start: i64, end: i64) -> Task {
        Task::new(name, day(start), day(end))
    }

    #[test]
    fn test_finish_to_start_overlap_is_reported_once() {
        let f = task("F", 0, 5);
        let s = task("S", 3, 8);
        let edges = vec![Dependency::new(f.id, s.id, DependencyKind::FinishToStart)];

        let conflicts = detect_conflicts(&[f.clone(), s.clone()], &edges);

        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts.messages_for(s.id), vec!["'S' starts before 'F' finishes"]);
        assert!(!conflicts.is_conflicted(f.id));
        assert!(conflicts.edge_violated(&edges[0]));
        assert!(!conflicts.edge_violated(&Dependency::new(f.id, s.id, DependencyKind::StartToStart)));
    }

    #[test]
    fn test_finish_to_start_gap_is_clean() {
        let f = task("F", 0, 5);
        let s = task("S", 6, 10);
        let edges = vec![Dependency::new(f.id, s.id, DependencyKind::FinishToStart)];

        assert!(detect_conflicts(&[f, s], &edges).is_empty());
    }

    #[test]
    fn test_each_kind_checks_its_own_boundaries() {
        let up = task("Up", 4, 8);
        // Starts before Up starts and ends before Up ends: breaks all four kinds.
        let early = task("Early", 0, 2);
        // Starts after Up starts but before Up ends, finishes after Up ends.
        let overlap = task("Overlap", 6, 10);

        let cases = [
            (DependencyKind::FinishToStart, true, true, "'Early' starts before 'Up' finishes"),
            (DependencyKind::StartToStart, true, false, "'Early' starts before 'Up' starts"),
            (DependencyKind::FinishToFinish, true, false, "'Early' finishes before 'Up' finishes"),
            (DependencyKind::StartToFinish, true, false, "'Early' finishes before 'Up' starts"),
        ];
        let tasks = vec![up.clone(), early.clone(), overlap.clone()];

        for (kind, early_bad, overlap_bad, message) in cases {
            let edges = vec![
                Dependency::new(up.id, early.id, kind),
                Dependency::new(up.id, overlap.id, kind),
            ];
            let conflicts = detect_conflicts(&tasks, &edges);
            assert_eq!(conflicts.is_conflicted(early.id), early_bad, "{kind:?}");
            assert_eq!(conflicts.is_conflicted(overlap.id), overlap_bad, "{kind:?}");
            assert_eq!(conflicts.messages_for(early.id), vec![message]);
        }
    }

    #[test]
    fn test_messages_accumulate_in_edge_order() {
        let a = task("A", 0, 10);
        let b = task("B", 0, 12);
        let c = task("C", 5, 6);
        let edges = vec![
            Dependency::new(b.id, c.id, DependencyKind::FinishToFinish),
            Dependency::new(a.id, c.id, DependencyKind::FinishToStart),
        ];

        let conflicts = detect_conflicts(&[a, b, c.clone()], &edges);

        assert_eq!(
            conflicts.messages_for(c.id),
            vec![
                "'C' finishes before 'B' finishes",
                "'C' starts before 'A' finishes",
            ]
        );
    }

    #[test]
    fn test_dangling_edges_are_inert() {
        let a = task("A", 0, 10);
        let b = task("B", 0, 2);
        let ghost = Uuid::new_v4();
        let edges = vec![
            Dependency::new(ghost, b.id, DependencyKind::FinishToStart),
            Dependency::new(a.id, ghost, DependencyKind::FinishToStart),
        ];

        assert!(detect_conflicts(&[a, b], &edges).is_empty());
    }

    #[test]
    fn test_cyclic_edges_are_checked_edge_by_edge() {
        let a = task("A", 0, 4);
        let b = task("B", 2, 6);
        let edges = vec![
            Dependency::new(a.id, b.id, DependencyKind::FinishToStart),
            Dependency::new(b.id, a.id, DependencyKind::FinishToStart),
        ];

        let conflicts = detect_conflicts(&[a.clone(), b.clone()], &edges);
        assert_eq!(conflicts.len(), 2);
        assert!(conflicts.is_conflicted(a.id));
        assert!(conflicts.is_conflicted(b.id));
    }

    #[test]
    fn test_detection_is_idempotent() {
        let a = task("A", 0, 4);
        let b = task("B", 1, 3);
        let tasks = vec![a.clone(), b.clone()];
        let edges = vec![
            Dependency::new(a.id, b.id, DependencyKind::FinishToStart),
            Dependency::new(a.id, b.id, DependencyKind::FinishToFinish),
        ];

        let first = detect_conflicts(&tasks, &edges);
        let second = detect_conflicts(&tasks, &edges);

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(tasks[1], b);
    }
}
