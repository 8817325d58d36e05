//! In-memory dependency graph and cycle checking.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Dependency, TaskId};

/// Adjacency over task ids built from an edge list.
///
/// Edges keep their list order inside each adjacency entry, so every walk
/// over the graph is deterministic for a given input.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// task -> tasks it depends on (sources of edges targeting it).
    upstream: HashMap<TaskId, Vec<TaskId>>,
    /// task -> tasks that depend on it.
    downstream: HashMap<TaskId, Vec<TaskId>>,
}

impl DependencyGraph {
    pub fn from_edges(edges: &[Dependency]) -> Self {
        let mut graph = Self::default();
        for dep in edges {
            graph.upstream.entry(dep.to_task).or_default().push(dep.from_task);
            graph.downstream.entry(dep.from_task).or_default().push(dep.to_task);
        }
        graph
    }

    /// Immediate predecessors of a task.
    pub fn predecessors_of(&self, id: TaskId) -> &[TaskId] {
        self.upstream.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Immediate successors of a task.
    pub fn successors_of(&self, id: TaskId) -> &[TaskId] {
        self.downstream.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every task reachable by walking upstream from `id`, in discovery order.
    pub fn ancestors_of(&self, id: TaskId) -> Vec<TaskId> {
        let mut found = Vec::new();
        self.walk_upstream(id, |node| {
            found.push(node);
            false
        });
        found
    }

    /// Whether adding `from -> to` would close a loop.
    ///
    /// The new edge makes `from` a predecessor of `to`; that is a cycle exactly
    /// when `to` is already an ancestor of `from`.
    pub fn would_cycle(&self, from: TaskId, to: TaskId) -> bool {
        if from == to {
            return true;
        }
        self.walk_upstream(from, |node| node == to)
    }

    /// Iterative depth-first walk upstream of `start` (exclusive). Stops and
    /// returns true as soon as `visit` returns true.
    fn walk_upstream(&self, start: TaskId, mut visit: impl FnMut(TaskId) -> bool) -> bool {
        let mut visited: HashSet<TaskId> = HashSet::new();
        visited.insert(start);
        let mut stack: Vec<TaskId> = self.predecessors_of(start).iter().rev().copied().collect();

        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            if visit(node) {
                return true;
            }
            stack.extend(
                self.predecessors_of(node)
                    .iter()
                    .rev()
                    .filter(|p| !visited.contains(*p)),
            );
        }
        false
    }
}

/// Would committing `proposed_from -> proposed_to` on top of `edges` create a
/// cycle? Run this before the edge is added to the list.
pub fn has_cycle(edges: &[Dependency], proposed_from: TaskId, proposed_to: TaskId) -> bool {
    if proposed_from == proposed_to {
        return true;
    }
    DependencyGraph::from_edges(edges).would_cycle(proposed_from, proposed_to)
}

/// [`has_cycle`] as a typed verdict.
pub fn check_link(edges: &[Dependency], from: TaskId, to: TaskId) -> Result<()> {
    if from == to {
        return Err(Error::SelfLoop(from));
    }
    if has_cycle(edges, from, to) {
        debug!(%from, %to, "candidate edge closes a cycle");
        return Err(Error::Cycle { from, to });
    }
    Ok(())
}
