//! taskflow-core
//!
//! Dependency-graph layering and role-based access for collaborative task
//! projects.
//!
//! # Modules
//! - **domain**: records and ids (Task, Project, Member, Role) plus the error taxonomy
//! - **graph**: graph builder, layering engine, position assigner, diagram view
//! - **access**: the pure access policy evaluator
//! - **ports**: store, clock and id-generator seams
//! - **impls**: in-memory store adapter
//! - **app**: mutation gate, project service, builder
//! - **config**: TOML-backed application configuration

pub mod access;
pub mod app;
pub mod config;
pub mod domain;
pub mod graph;
pub mod impls;
pub mod ports;

#[cfg(test)]
mod test_support;

pub use access::{AccessDecision, DenyReason, Operation, evaluate_access};
pub use app::{AppBuilder, BatchReport, Mutation, MutationGate, MutationOutcome, ProjectService};
pub use config::AppConfig;
pub use domain::{Result, TaskflowError};
pub use graph::{
    Diagram, GraphNode, LayoutConfig, Position, build_graph, compute_layout, compute_levels,
};
