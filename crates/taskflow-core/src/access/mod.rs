//! Role-based access control.

pub mod policy;

pub use policy::{AccessDecision, DenyReason, Operation, evaluate_access};
