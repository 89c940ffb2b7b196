//! ProjectStore port: persistence of project records and their membership.

use async_trait::async_trait;

use crate::domain::{Project, ProjectId, StoreError, UserId};

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn get_project(&self, project_id: &ProjectId) -> Result<Option<Project>, StoreError>;

    /// Projects the user owns or holds a resolved membership in.
    async fn projects_for_user(&self, user_id: &UserId) -> Result<Vec<Project>, StoreError>;

    async fn insert_project(&self, project: Project) -> Result<(), StoreError>;

    async fn save_project(&self, project: Project) -> Result<(), StoreError>;

    /// Remove the project and every task it holds. Returns whether it existed.
    async fn delete_project(&self, project_id: &ProjectId) -> Result<bool, StoreError>;
}
