//! Layering: longest-path level of every task from a dependency-free root.
//!
//! Kahn's topological sort with level propagation. Ready tasks are processed
//! in input order, so identical inputs always produce identical levels.
//!
//! Tasks that never become ready (they sit on a cycle or depend on one) are
//! put at level 0 once the queue drains. The result always holds exactly one
//! level per distinct input task id.

use std::collections::{HashMap, VecDeque};

use tracing::warn;

use super::builder::{DependencyGraph, GraphNode};
use crate::domain::TaskId;

pub type Levels = HashMap<TaskId, usize>;

/// Compute levels for `tasks`. Pure; never fails.
pub fn compute_levels<N: GraphNode>(tasks: &[N]) -> Levels {
    levels_for_graph(&DependencyGraph::build(tasks))
}

/// Compute levels for an already built graph.
pub fn levels_for_graph(graph: &DependencyGraph) -> Levels {
    let mut remaining = graph.in_degrees().clone();
    let mut levels: Levels = HashMap::with_capacity(graph.len());
    let mut queue = VecDeque::new();

    for id in graph.task_ids() {
        if graph.in_degree(id) == 0 {
            levels.insert(id.clone(), 0);
            queue.push_back(id.clone());
        }
    }

    // Provisional levels of tasks still waiting on prerequisites.
    let mut pending: HashMap<TaskId, usize> = HashMap::new();

    while let Some(current) = queue.pop_front() {
        let current_level = levels.get(&current).copied().unwrap_or(0);

        for neighbor in graph.dependents(&current) {
            let candidate = current_level + 1;
            let level = pending.entry(neighbor.clone()).or_insert(0);
            *level = (*level).max(candidate);

            let Some(degree) = remaining.get_mut(neighbor) else {
                continue;
            };
            *degree = degree.saturating_sub(1);
            if *degree == 0 {
                let resolved = pending.remove(neighbor).unwrap_or(candidate);
                levels.insert(neighbor.clone(), resolved);
                queue.push_back(neighbor.clone());
            }
        }
    }

    let mut unresolved = 0usize;
    for id in graph.task_ids() {
        if !levels.contains_key(id) {
            levels.insert(id.clone(), 0);
            unresolved += 1;
        }
    }
    if unresolved > 0 {
        warn!(
            unresolved,
            total = graph.len(),
            "dependency cycle detected; affected tasks placed at level 0"
        );
    }

    levels
}
