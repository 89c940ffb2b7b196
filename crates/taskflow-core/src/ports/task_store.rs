//! TaskStore port: persistence of task records, keyed by project.
//!
//! Adapters must give read-your-writes consistency per project. No
//! cross-request isolation is assumed; the last write to a record wins.

use async_trait::async_trait;

use crate::domain::{ProjectId, StoreError, Task, TaskId};

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All tasks of a project, in creation order.
    async fn list_tasks(&self, project_id: &ProjectId) -> Result<Vec<Task>, StoreError>;

    async fn get_task(
        &self,
        project_id: &ProjectId,
        task_id: &TaskId,
    ) -> Result<Option<Task>, StoreError>;

    /// Insert a new task. Fails with `AlreadyExists` on an id clash.
    async fn insert_task(&self, task: Task) -> Result<(), StoreError>;

    /// Replace an existing task (upsert).
    async fn save_task(&self, task: Task) -> Result<(), StoreError>;

    /// Remove a task. Returns whether it existed.
    async fn delete_task(&self, project_id: &ProjectId, task_id: &TaskId)
    -> Result<bool, StoreError>;
}
