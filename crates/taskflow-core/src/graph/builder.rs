//! Dependency graph built from a project's task list.
//!
//! Design:
//! - Forward edges: prerequisite -> tasks that depend on it
//! - In-degree: task -> number of prerequisites present in the list
//! - Dependency ids that name no task in the list are ignored: no edge, no
//!   in-degree. Stale references must not break the diagram.
//! - A `(prerequisite, dependent)` pair is an edge at most once, however often
//!   it is listed.

use std::collections::{HashMap, HashSet};

use crate::domain::{Task, TaskId};

/// A vertex of the dependency graph: an id plus the ids it waits on.
///
/// [`Task`] is the usual implementor; anything exported from a store with
/// just ids and dependency lists can be laid out the same way.
pub trait GraphNode {
    fn node_id(&self) -> &TaskId;

    /// Prerequisites, in the order the node lists them.
    fn prerequisites(&self) -> &[TaskId];
}

impl GraphNode for Task {
    fn node_id(&self) -> &TaskId {
        &self.id
    }

    fn prerequisites(&self) -> &[TaskId] {
        &self.dependencies
    }
}

/// Adjacency view of a task list.
///
/// `order` keeps the input order of task ids (first occurrence wins for
/// duplicated ids); every traversal that needs determinism walks it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    order: Vec<TaskId>,
    /// Forward edges: prerequisite -> dependents, in input order.
    adjacency: HashMap<TaskId, Vec<TaskId>>,
    in_degree: HashMap<TaskId, usize>,
    /// Distinct `(prerequisite, dependent)` pairs in discovery order.
    edges: Vec<(TaskId, TaskId)>,
}

impl DependencyGraph {
    /// Build the graph for `tasks`. Pure; never fails.
    pub fn build<N: GraphNode>(tasks: &[N]) -> Self {
        let mut graph = Self::default();
        let mut first = Vec::with_capacity(tasks.len());

        for task in tasks {
            let id = task.node_id();
            if graph.adjacency.contains_key(id) {
                continue;
            }
            graph.order.push(id.clone());
            graph.adjacency.insert(id.clone(), Vec::new());
            graph.in_degree.insert(id.clone(), 0);
            first.push(task);
        }

        let mut linked: HashSet<(&TaskId, &TaskId)> = HashSet::new();
        for task in first {
            let id = task.node_id();
            for dep in task.prerequisites() {
                let Some(dependents) = graph.adjacency.get_mut(dep) else {
                    continue;
                };
                if !linked.insert((dep, id)) {
                    continue;
                }
                dependents.push(id.clone());
                *graph.in_degree.entry(id.clone()).or_default() += 1;
                graph.edges.push((dep.clone(), id.clone()));
            }
        }

        graph
    }

    /// Task ids in input order.
    pub fn task_ids(&self) -> &[TaskId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Tasks that list `id` as a prerequisite.
    pub fn dependents(&self, id: &TaskId) -> &[TaskId] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of resolvable prerequisites of `id`.
    pub fn in_degree(&self, id: &TaskId) -> usize {
        self.in_degree.get(id).copied().unwrap_or(0)
    }

    pub fn adjacency(&self) -> &HashMap<TaskId, Vec<TaskId>> {
        &self.adjacency
    }

    pub fn in_degrees(&self) -> &HashMap<TaskId, usize> {
        &self.in_degree
    }

    /// Resolvable edges `(prerequisite, dependent)`, each once, ordered by
    /// dependent and then by the dependent's dependency list.
    pub fn edges(&self) -> impl Iterator<Item = (&TaskId, &TaskId)> {
        self.edges.iter().map(|(dep, task)| (dep, task))
    }
}

/// Convenience wrapper for [`DependencyGraph::build`].
pub fn build_graph<N: GraphNode>(tasks: &[N]) -> DependencyGraph {
    DependencyGraph::build(tasks)
}
