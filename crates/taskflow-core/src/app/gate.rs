//! Mutation Gate - the single entry point for state-changing operations.
//!
//! Every mutation runs the same pipeline:
//! 1. load the target project (missing -> `NotFound`)
//! 2. derive the policy [`Operation`] from the [`Mutation`] itself
//! 3. consult [`evaluate_access`]; on deny, return without touching storage
//! 4. validate the payload and apply exactly one logical write
//!
//! Deleting a task also strips its id from every other task's dependency list.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::access::{AccessDecision, DenyReason, Operation, evaluate_access};
use crate::domain::{
    ConflictError, Member, MemberRef, NotFoundError, Project, ProjectId, ProjectPatch, Result,
    Role, Task, TaskDraft, TaskId, TaskPatch, TaskflowError, UserId, ValidationError,
};
use crate::ports::{Clock, IdGenerator, ProjectStore, TaskStore};

/// A requested change, carrying its payload.
#[derive(Debug, Clone)]
pub enum Mutation {
    CreateTask(TaskDraft),
    UpdateTask { task_id: TaskId, patch: TaskPatch },
    DeleteTask { task_id: TaskId },
    InviteMember { email: String, role: Role },
    RemoveMember { member: MemberRef },
    ChangeMemberRole { member: MemberRef, role: Role },
    UpdateProject(ProjectPatch),
    DeleteProject,
}

impl Mutation {
    /// The policy operation this mutation is checked against.
    pub fn operation(&self, project: &Project) -> Operation {
        match self {
            Mutation::CreateTask(_) => Operation::CreateTask,
            Mutation::UpdateTask { .. } => Operation::UpdateTask,
            Mutation::DeleteTask { .. } => Operation::DeleteTask,
            Mutation::InviteMember { .. } => Operation::InviteMember,
            Mutation::RemoveMember { member } => Operation::RemoveMember {
                target: member_target(project, member),
            },
            Mutation::ChangeMemberRole { member, .. } => Operation::ChangeMemberRole {
                target: member_target(project, member),
            },
            Mutation::UpdateProject(_) => Operation::UpdateProject,
            Mutation::DeleteProject => Operation::DeleteProject,
        }
    }
}

/// User id a member reference points at. A user-id reference is taken as
/// given, so the owner stays protected even without a membership entry.
fn member_target(project: &Project, member: &MemberRef) -> Option<UserId> {
    match member {
        MemberRef::UserId(id) => Some(id.clone()),
        MemberRef::Email(_) => project.find_member(member).and_then(|m| m.user_id.clone()),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Task(Task),
    TaskDeleted {
        task_id: TaskId,
        /// False when the task did not exist (deletion is idempotent).
        existed: bool,
        /// Tasks whose dependency lists referenced the deleted id.
        detached: Vec<TaskId>,
    },
    Project(Project),
    ProjectDeleted { project_id: ProjectId },
}

/// Result of a best-effort batch. Each item was gated on its own.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub deleted: Vec<TaskId>,
    pub failed: Vec<(TaskId, TaskflowError)>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct MutationGate<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl<S> Clone for MutationGate<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            ids: Arc::clone(&self.ids),
        }
    }
}

impl<S: TaskStore + ProjectStore> MutationGate<S> {
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, clock, ids }
    }

    /// Load `project_id` and check `operation` for `actor`.
    ///
    /// Returns the project and the actor's resolved role on success.
    pub async fn authorize(
        &self,
        actor: &UserId,
        project_id: &ProjectId,
        operation: &Operation,
    ) -> Result<(Project, Role)> {
        let project = self.load_project(project_id).await?;
        let role = check(actor, &project, operation)?;
        Ok((project, role))
    }

    /// Check and apply one mutation.
    pub async fn gated_mutate(
        &self,
        actor: &UserId,
        project_id: &ProjectId,
        mutation: Mutation,
    ) -> Result<MutationOutcome> {
        let project = self.load_project(project_id).await?;
        let operation = mutation.operation(&project);
        let role = check(actor, &project, &operation)?;

        let outcome = self.apply(actor, project, mutation).await?;
        info!(
            project = %project_id,
            actor = %actor,
            %role,
            op = %operation,
            "mutation applied"
        );
        Ok(outcome)
    }

    /// Delete every task of the project, one gated delete per task.
    ///
    /// Not a transaction: a failure part-way leaves the earlier deletions in
    /// place and is reported per task.
    pub async fn clear_tasks(&self, actor: &UserId, project_id: &ProjectId) -> Result<BatchReport> {
        self.authorize(actor, project_id, &Operation::DeleteTask).await?;
        let tasks = self.store.list_tasks(project_id).await?;

        let mut report = BatchReport::default();
        for task in tasks {
            let mutation = Mutation::DeleteTask {
                task_id: task.id.clone(),
            };
            match self.gated_mutate(actor, project_id, mutation).await {
                Ok(_) => report.deleted.push(task.id),
                Err(err) => {
                    warn!(task = %task.id, error = %err, "batch delete item failed");
                    report.failed.push((task.id, err));
                }
            }
        }
        Ok(report)
    }

    async fn load_project(&self, project_id: &ProjectId) -> Result<Project> {
        self.store
            .get_project(project_id)
            .await?
            .ok_or_else(|| NotFoundError::Project(project_id.clone()).into())
    }

    async fn apply(
        &self,
        actor: &UserId,
        mut project: Project,
        mutation: Mutation,
    ) -> Result<MutationOutcome> {
        let now = self.clock.now();

        match mutation {
            Mutation::CreateTask(draft) => {
                let id = self.ids.generate_task_id();
                let mut task = draft.into_task(id, project.id.clone(), actor, now)?;
                self.prune_unknown_dependencies(&mut task).await?;
                self.store.insert_task(task.clone()).await?;
                Ok(MutationOutcome::Task(task))
            }
            Mutation::UpdateTask { task_id, patch } => {
                let current = self
                    .store
                    .get_task(&project.id, &task_id)
                    .await?
                    .ok_or_else(|| NotFoundError::Task(task_id.clone()))?;
                let mut task = current.patched(&patch)?;
                if patch.dependencies.is_some() {
                    self.prune_unknown_dependencies(&mut task).await?;
                }
                task.touch(actor, now);
                self.store.save_task(task.clone()).await?;
                Ok(MutationOutcome::Task(task))
            }
            Mutation::DeleteTask { task_id } => {
                // Dependents are detached before the delete, so an interrupted
                // sweep leaves the task in place and no dangling ids behind.
                let mut detached = Vec::new();
                for mut task in self.store.list_tasks(&project.id).await? {
                    if task.id == task_id || !task.remove_dependency(&task_id) {
                        continue;
                    }
                    task.touch(actor, now);
                    let dependent = task.id.clone();
                    if let Err(err) = self.store.save_task(task).await {
                        warn!(
                            task = %task_id,
                            failed = %dependent,
                            ?detached,
                            "dependency sweep interrupted; task not deleted"
                        );
                        return Err(err.into());
                    }
                    detached.push(dependent);
                }
                let existed = self.store.delete_task(&project.id, &task_id).await?;
                if !existed {
                    debug!(task = %task_id, "delete of unknown task is a no-op");
                }
                Ok(MutationOutcome::TaskDeleted {
                    task_id,
                    existed,
                    detached,
                })
            }
            Mutation::InviteMember { email, role } => {
                let email = email.trim().to_string();
                if email.is_empty() {
                    return Err(ValidationError::EmptyEmail.into());
                }
                if role == Role::Owner {
                    return Err(ConflictError::SecondOwner.into());
                }
                if project.has_email(&email) {
                    return Err(ConflictError::DuplicateEmail(email).into());
                }
                project.members.push(Member {
                    user_id: None,
                    email,
                    role,
                    invited_at: now,
                    invited_by: actor.clone(),
                });
                self.save_project(project, now).await
            }
            Mutation::RemoveMember { member } => {
                let index = project
                    .members
                    .iter()
                    .position(|m| member.matches(m))
                    .ok_or_else(|| NotFoundError::Member(member.to_string()))?;
                project.members.remove(index);
                self.save_project(project, now).await
            }
            Mutation::ChangeMemberRole { member, role } => {
                if role == Role::Owner {
                    return Err(ConflictError::SecondOwner.into());
                }
                let entry = project
                    .find_member_mut(&member)
                    .ok_or_else(|| NotFoundError::Member(member.to_string()))?;
                entry.role = role;
                self.save_project(project, now).await
            }
            Mutation::UpdateProject(patch) => {
                project.apply_patch(&patch)?;
                self.save_project(project, now).await
            }
            Mutation::DeleteProject => {
                self.store.delete_project(&project.id).await?;
                Ok(MutationOutcome::ProjectDeleted {
                    project_id: project.id,
                })
            }
        }
    }

    async fn save_project(
        &self,
        mut project: Project,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<MutationOutcome> {
        project.updated_at = now;
        self.store.save_project(project.clone()).await?;
        Ok(MutationOutcome::Project(project))
    }

    /// Drop dependency ids that name no task of the task's project.
    async fn prune_unknown_dependencies(&self, task: &mut Task) -> Result<()> {
        if task.dependencies.is_empty() {
            return Ok(());
        }
        let known: HashSet<TaskId> = self
            .store
            .list_tasks(&task.project_id)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        let pruned = task.retain_dependencies(|dep| known.contains(dep));
        if !pruned.is_empty() {
            warn!(task = %task.id, ?pruned, "dropped dependencies on unknown tasks");
        }
        Ok(())
    }
}

/// Map a policy decision to the error taxonomy.
fn check(actor: &UserId, project: &Project, operation: &Operation) -> Result<Role> {
    match evaluate_access(actor, project, operation) {
        AccessDecision::Allow { role } => {
            debug!(project = %project.id, actor = %actor, op = %operation, %role, "access allowed");
            Ok(role)
        }
        AccessDecision::Deny { reason } => {
            debug!(project = %project.id, actor = %actor, op = %operation, %reason, "access denied");
            match reason {
                DenyReason::OwnerProtected => Err(ConflictError::OwnerProtected.into()),
                reason => Err(TaskflowError::Permission { reason }),
            }
        }
    }
}
