//! Error taxonomy for the task-graph core.
//!
//! The four boundary classes (validation, not-found, permission, conflict)
//! stay distinguishable so the transport layer can decide how much existence
//! information it reveals. `Store` wraps adapter failures.

use thiserror::Error;

use super::ids::{ProjectId, TaskId};
use crate::access::DenyReason;

pub type Result<T> = std::result::Result<T, TaskflowError>;

#[derive(Debug, Error)]
pub enum TaskflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("permission denied: {reason}")]
    Permission { reason: DenyReason },

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl TaskflowError {
    /// Stable tag for the error class, used in logs and by transports.
    pub fn kind(&self) -> &'static str {
        match self {
            TaskflowError::Validation(_) => "validation",
            TaskflowError::NotFound(_) => "not_found",
            TaskflowError::Permission { .. } => "permission",
            TaskflowError::Conflict(_) => "conflict",
            TaskflowError::Store(_) => "store",
        }
    }
}

/// Malformed input rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task name must not be empty")]
    EmptyTaskName,

    #[error("project name must not be empty")]
    EmptyProjectName,

    #[error("member email must not be empty")]
    EmptyEmail,

    #[error("start date {start} is after end date {end}")]
    DateRange { start: String, end: String },

    #[error("invalid date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    #[error("unknown role `{0}` (expected owner|manager|viewer)")]
    UnknownRole(String),

    #[error("unknown status `{0}` (expected not-started|in-progress|completed)")]
    UnknownStatus(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// A referenced record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    #[error("project not found: {0}")]
    Project(ProjectId),

    #[error("task not found: {0}")]
    Task(TaskId),

    #[error("member not found: {0}")]
    Member(String),
}

/// The request is well-formed but collides with an existing invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    #[error("member already invited: {0}")]
    DuplicateEmail(String),

    #[error("the project owner cannot be removed or demoted")]
    OwnerProtected,

    #[error("a project has exactly one owner; the owner role cannot be granted")]
    SecondOwner,

    #[error("user `{0}` is already a member of this project")]
    AlreadyMember(String),
}

/// Failure reported by a store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record already exists: {0}")]
    AlreadyExists(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        let err: TaskflowError = ValidationError::EmptyTaskName.into();
        assert_eq!(err.kind(), "validation");

        let err = TaskflowError::Permission {
            reason: DenyReason::InsufficientRole,
        };
        assert_eq!(err.kind(), "permission");
        assert_eq!(err.to_string(), "permission denied: insufficient_role");

        let err: TaskflowError = ConflictError::DuplicateEmail("a@b.c".into()).into();
        assert_eq!(err.kind(), "conflict");
    }
}
