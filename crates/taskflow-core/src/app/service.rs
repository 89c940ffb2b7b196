//! ProjectService - read side plus project creation, in front of the gate.
//!
//! Reads are checked as [`Operation::View`]; every write goes through
//! [`MutationGate::gated_mutate`].

use std::sync::Arc;

use tracing::info;

use super::gate::{BatchReport, Mutation, MutationGate, MutationOutcome};
use crate::access::{DenyReason, Operation};
use crate::domain::{
    ConflictError, Identity, Member, MemberRef, NotFoundError, Project, ProjectDraft, ProjectId,
    Result, Role, Task, TaskflowError, UserId, ValidationError,
};
use crate::graph::{Diagram, LayoutConfig};
use crate::ports::{Clock, IdGenerator, ProjectStore, TaskStore};

pub struct ProjectService<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    gate: MutationGate<S>,
    layout: LayoutConfig,
}

impl<S: TaskStore + ProjectStore> ProjectService<S> {
    pub fn new(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        layout: LayoutConfig,
    ) -> Self {
        let gate = MutationGate::new(Arc::clone(&store), Arc::clone(&clock), Arc::clone(&ids));
        Self {
            store,
            clock,
            ids,
            gate,
            layout,
        }
    }

    pub fn gate(&self) -> &MutationGate<S> {
        &self.gate
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Create a project owned by `creator`, who becomes its only member.
    pub async fn create_project(&self, creator: &Identity, draft: ProjectDraft) -> Result<Project> {
        if creator.user_id.is_empty() {
            return Err(TaskflowError::Permission {
                reason: DenyReason::NotAMember,
            });
        }
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyProjectName.into());
        }

        let now = self.clock.now();
        let project = Project {
            id: self.ids.generate_project_id(),
            name: name.to_string(),
            description: draft
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            owner_id: creator.user_id.clone(),
            members: vec![Member {
                user_id: Some(creator.user_id.clone()),
                email: creator.email.trim().to_string(),
                role: Role::Owner,
                invited_at: now,
                invited_by: creator.user_id.clone(),
            }],
            created_at: now,
            updated_at: now,
        };
        self.store.insert_project(project.clone()).await?;
        info!(project = %project.id, owner = %creator.user_id, "project created");
        Ok(project)
    }

    /// Bind the caller's user id to the pending invite addressed to their
    /// email. The invite carries the role; no policy check applies because
    /// the caller is not a member yet.
    pub async fn accept_invite(&self, invitee: &Identity, project_id: &ProjectId) -> Result<Project> {
        if invitee.user_id.is_empty() {
            return Err(TaskflowError::Permission {
                reason: DenyReason::NotAMember,
            });
        }
        let mut project = self
            .store
            .get_project(project_id)
            .await?
            .ok_or_else(|| NotFoundError::Project(project_id.clone()))?;

        if project.role_of(&invitee.user_id).is_some() {
            return Err(ConflictError::AlreadyMember(invitee.user_id.to_string()).into());
        }
        let email = MemberRef::Email(invitee.email.trim().to_string());
        let entry = project
            .members
            .iter_mut()
            .find(|m| m.is_pending() && email.matches(m))
            .ok_or_else(|| NotFoundError::Member(email.to_string()))?;
        entry.user_id = Some(invitee.user_id.clone());

        project.updated_at = self.clock.now();
        self.store.save_project(project.clone()).await?;
        info!(project = %project.id, user = %invitee.user_id, "invite accepted");
        Ok(project)
    }

    /// Projects `actor` belongs to, most recently updated first.
    pub async fn list_projects(&self, actor: &UserId) -> Result<Vec<Project>> {
        if actor.is_empty() {
            return Ok(Vec::new());
        }
        let mut projects = self.store.projects_for_user(actor).await?;
        projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
        Ok(projects)
    }

    pub async fn view_project(&self, actor: &UserId, project_id: &ProjectId) -> Result<Project> {
        let (project, _) = self.gate.authorize(actor, project_id, &Operation::View).await?;
        Ok(project)
    }

    /// Role of `actor` in the project, if a member.
    pub async fn role_in(&self, actor: &UserId, project_id: &ProjectId) -> Result<Role> {
        let (_, role) = self.gate.authorize(actor, project_id, &Operation::View).await?;
        Ok(role)
    }

    /// Tasks of the project in creation order.
    pub async fn list_tasks(&self, actor: &UserId, project_id: &ProjectId) -> Result<Vec<Task>> {
        self.gate.authorize(actor, project_id, &Operation::View).await?;
        Ok(self.store.list_tasks(project_id).await?)
    }

    /// Positioned nodes and edges for the project's current task set.
    pub async fn project_layout(&self, actor: &UserId, project_id: &ProjectId) -> Result<Diagram> {
        let tasks = self.list_tasks(actor, project_id).await?;
        Ok(Diagram::build(&tasks, &self.layout))
    }

    pub async fn mutate(
        &self,
        actor: &UserId,
        project_id: &ProjectId,
        mutation: Mutation,
    ) -> Result<MutationOutcome> {
        self.gate.gated_mutate(actor, project_id, mutation).await
    }

    pub async fn clear_tasks(&self, actor: &UserId, project_id: &ProjectId) -> Result<BatchReport> {
        self.gate.clear_tasks(actor, project_id).await
    }
}
