//! InMemoryStore - development/test adapter for both store ports.
//!
//! One `tokio::sync::Mutex` guards all state, which trivially gives
//! read-your-writes per project. Task lists are kept per project in insertion
//! order so `list_tasks` returns creation order.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Project, ProjectId, StoreError, Task, TaskId, UserId};
use crate::ports::{ProjectStore, TaskStore};

#[derive(Default)]
struct InMemoryState {
    projects: HashMap<ProjectId, Project>,
    tasks: HashMap<ProjectId, Vec<Task>>,
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored tasks across projects.
    pub async fn task_count(&self) -> usize {
        let state = self.state.lock().await;
        state.tasks.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn list_tasks(&self, project_id: &ProjectId) -> Result<Vec<Task>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.tasks.get(project_id).cloned().unwrap_or_default())
    }

    async fn get_task(
        &self,
        project_id: &ProjectId,
        task_id: &TaskId,
    ) -> Result<Option<Task>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .tasks
            .get(project_id)
            .and_then(|tasks| tasks.iter().find(|t| &t.id == task_id))
            .cloned())
    }

    async fn insert_task(&self, task: Task) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let tasks = state.tasks.entry(task.project_id.clone()).or_default();
        if tasks.iter().any(|t| t.id == task.id) {
            return Err(StoreError::AlreadyExists(task.id.to_string()));
        }
        tasks.push(task);
        Ok(())
    }

    async fn save_task(&self, task: Task) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let tasks = state.tasks.entry(task.project_id.clone()).or_default();
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => *slot = task,
            None => tasks.push(task),
        }
        Ok(())
    }

    async fn delete_task(
        &self,
        project_id: &ProjectId,
        task_id: &TaskId,
    ) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        let Some(tasks) = state.tasks.get_mut(project_id) else {
            return Ok(false);
        };
        let before = tasks.len();
        tasks.retain(|t| &t.id != task_id);
        Ok(tasks.len() != before)
    }
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    async fn get_project(&self, project_id: &ProjectId) -> Result<Option<Project>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.projects.get(project_id).cloned())
    }

    async fn projects_for_user(&self, user_id: &UserId) -> Result<Vec<Project>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .projects
            .values()
            .filter(|p| p.role_of(user_id).is_some())
            .cloned()
            .collect())
    }

    async fn insert_project(&self, project: Project) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.projects.contains_key(&project.id) {
            return Err(StoreError::AlreadyExists(project.id.to_string()));
        }
        state.projects.insert(project.id.clone(), project);
        Ok(())
    }

    async fn save_project(&self, project: Project) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.projects.insert(project.id.clone(), project);
        Ok(())
    }

    async fn delete_project(&self, project_id: &ProjectId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        state.tasks.remove(project_id);
        Ok(state.projects.remove(project_id).is_some())
    }
}
