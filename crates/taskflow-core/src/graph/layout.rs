//! Position assignment and the diagram view handed to renderers.
//!
//! x depends only on level; within a level, tasks keep their input order and
//! are stacked `vertical_spacing` apart, centered on `origin_y`. Every call
//! recomputes the full task set.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::builder::{DependencyGraph, GraphNode};
use super::levels::levels_for_graph;
use crate::domain::{TaskId, ValidationError};

/// Spacing and origin of the diagram, in renderer units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl LayoutConfig {
    pub const DEFAULT_HORIZONTAL_SPACING: f64 = 350.0;
    pub const DEFAULT_VERTICAL_SPACING: f64 = 180.0;
    pub const DEFAULT_ORIGIN: f64 = 50.0;

    /// Spacings must be finite and positive, origins finite.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, value) in [
            ("horizontal_spacing", self.horizontal_spacing),
            ("vertical_spacing", self.vertical_spacing),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ValidationError::Config(format!(
                    "{name} must be a positive number (got {value})"
                )));
            }
        }
        for (name, value) in [("origin_x", self.origin_x), ("origin_y", self.origin_y)] {
            if !value.is_finite() {
                return Err(ValidationError::Config(format!(
                    "{name} must be finite (got {value})"
                )));
            }
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            horizontal_spacing: Self::DEFAULT_HORIZONTAL_SPACING,
            vertical_spacing: Self::DEFAULT_VERTICAL_SPACING,
            origin_x: Self::DEFAULT_ORIGIN,
            origin_y: Self::DEFAULT_ORIGIN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Task id -> position, for every distinct input task.
pub type Layout = BTreeMap<TaskId, Position>;

/// Compute positions for `tasks`.
pub fn compute_layout<N: GraphNode>(tasks: &[N], config: &LayoutConfig) -> Layout {
    let graph = DependencyGraph::build(tasks);
    layout_for_graph(&graph, config)
}

fn layout_for_graph(graph: &DependencyGraph, config: &LayoutConfig) -> Layout {
    let levels = levels_for_graph(graph);

    let mut by_level: BTreeMap<usize, Vec<&TaskId>> = BTreeMap::new();
    for id in graph.task_ids() {
        let level = levels.get(id).copied().unwrap_or(0);
        by_level.entry(level).or_default().push(id);
    }

    let mut layout = Layout::new();
    for (level, ids) in by_level {
        let x = config.origin_x + level as f64 * config.horizontal_spacing;
        let column_height = ids.len() as f64 * config.vertical_spacing;
        let top = config.origin_y - column_height / 2.0 + config.vertical_spacing / 2.0;

        for (index, id) in ids.into_iter().enumerate() {
            let y = top + index as f64 * config.vertical_spacing;
            layout.insert(id.clone(), Position { x, y });
        }
    }
    layout
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramNode {
    pub id: TaskId,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramEdge {
    /// `"<source>-<target>"`.
    pub id: String,
    pub source: TaskId,
    pub target: TaskId,
}

/// Nodes in task-list order plus one edge per resolvable dependency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

impl Diagram {
    pub fn build<N: GraphNode>(tasks: &[N], config: &LayoutConfig) -> Self {
        let graph = DependencyGraph::build(tasks);
        let layout = layout_for_graph(&graph, config);

        let mut seen: HashSet<&TaskId> = HashSet::new();
        let nodes = tasks
            .iter()
            .filter(|task| seen.insert(task.node_id()))
            .filter_map(|task| {
                layout.get(task.node_id()).map(|position| DiagramNode {
                    id: task.node_id().clone(),
                    position: *position,
                })
            })
            .collect();

        let edges = graph
            .edges()
            .map(|(source, target)| DiagramEdge {
                id: format!("{source}-{target}"),
                source: source.clone(),
                target: target.clone(),
            })
            .collect();

        Self { nodes, edges }
    }

    pub fn position_of(&self, id: &TaskId) -> Option<Position> {
        self.nodes
            .iter()
            .find(|node| &node.id == id)
            .map(|node| node.position)
    }
}
