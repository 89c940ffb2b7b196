//! Domain model (ids, tasks, projects, errors).

pub mod errors;
pub mod ids;
pub mod project;
pub mod task;

pub use errors::{
    ConflictError, NotFoundError, Result, StoreError, TaskflowError, ValidationError,
};
pub use ids::{ProjectId, TaskId, UserId};
pub use project::{Identity, Member, MemberRef, Project, ProjectDraft, ProjectPatch, Role};
pub use task::{Task, TaskDraft, TaskPatch, TaskStatus};
