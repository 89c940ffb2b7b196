//! Dependency graph, layering and diagram layout.
//!
//! - [`builder`] turns a task list into forward edges and in-degrees.
//! - [`levels`] assigns each task its longest-path level.
//! - [`layout`] maps levels to coordinates and builds the diagram view.
//!
//! All functions here are pure: they take the full current task list and
//! return a fresh result. Malformed structure (dangling ids, cycles) degrades
//! gracefully instead of failing.

pub mod builder;
pub mod layout;
pub mod levels;

pub use builder::{DependencyGraph, GraphNode, build_graph};
pub use layout::{
    Diagram, DiagramEdge, DiagramNode, Layout, LayoutConfig, Position, compute_layout,
};
pub use levels::{Levels, compute_levels};
