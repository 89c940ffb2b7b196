//! App layer: the mutation gate, the read-side service and their wiring.
//!
//! - **MutationGate**: access check + single write per mutation
//! - **ProjectService**: project creation, gated reads, diagram view
//! - **AppBuilder**: fail-fast construction with defaults

pub mod builder;
pub mod gate;
pub mod service;

pub use self::builder::{AppBuilder, BuildError};
pub use self::gate::{BatchReport, Mutation, MutationGate, MutationOutcome};
pub use self::service::ProjectService;
