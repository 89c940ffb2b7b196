//! AppBuilder - wires the store, clock and id generator into a service.
//!
//! Configuration is validated in `build()` so a bad layout config fails at
//! startup instead of on the first diagram request.

use std::sync::Arc;

use super::service::ProjectService;
use crate::domain::ValidationError;
use crate::graph::LayoutConfig;
use crate::ports::{Clock, IdGenerator, ProjectStore, SystemClock, TaskStore, UlidGenerator};

/// # Example
/// ```ignore
/// let service = AppBuilder::new(InMemoryStore::new())
///     .layout(config.layout)
///     .build()?;
/// ```
pub struct AppBuilder<S> {
    store: Arc<S>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    layout: LayoutConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid layout configuration: {0}")]
    InvalidLayout(#[source] ValidationError),
}

impl<S: TaskStore + ProjectStore> AppBuilder<S> {
    pub fn new(store: S) -> Self {
        Self::with_shared_store(Arc::new(store))
    }

    /// Use a store that is also held elsewhere (e.g. by a test).
    pub fn with_shared_store(store: Arc<S>) -> Self {
        Self {
            store,
            clock: None,
            ids: None,
            layout: LayoutConfig::default(),
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Defaults: [`SystemClock`] and a ULID generator on that clock.
    pub fn build(self) -> Result<ProjectService<S>, BuildError> {
        self.layout.validate().map_err(BuildError::InvalidLayout)?;

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(SystemClock)) as Arc<dyn IdGenerator>);
        Ok(ProjectService::new(self.store, clock, ids, self.layout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::DenyReason;
    use crate::app::Mutation;
    use crate::domain::{
        Identity, ProjectDraft, ProjectId, Role, TaskDraft, TaskId, TaskflowError, UserId,
    };
    use crate::impls::InMemoryStore;
    use crate::ports::FixedClock;
    use crate::test_support::{ALICE, BOB, DAVE, at};

    fn service() -> ProjectService<InMemoryStore> {
        AppBuilder::new(InMemoryStore::new())
            .clock(Arc::new(FixedClock::new(at())))
            .build()
            .unwrap()
    }

    fn alice() -> Identity {
        Identity::new(ALICE, "alice@example.com")
    }

    #[test]
    fn build_rejects_invalid_layout() {
        let layout = LayoutConfig {
            horizontal_spacing: -1.0,
            ..LayoutConfig::default()
        };
        let result = AppBuilder::new(InMemoryStore::new()).layout(layout).build();
        assert!(matches!(result, Err(BuildError::InvalidLayout(_))));
    }

    #[tokio::test]
    async fn creator_becomes_owner_member() {
        let svc = service();
        let project = svc
            .create_project(&alice(), ProjectDraft::new(" Launch "))
            .await
            .unwrap();

        assert_eq!(project.name, "Launch");
        assert_eq!(project.owner_id, UserId::new(ALICE));
        assert_eq!(project.members.len(), 1);
        assert_eq!(project.role_of(&UserId::new(ALICE)), Some(Role::Owner));
        assert!(project.id.as_str().starts_with("project-"));
    }

    #[tokio::test]
    async fn create_project_validates_input() {
        let svc = service();
        let err = svc
            .create_project(&alice(), ProjectDraft::new("  "))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");

        let anonymous = Identity::new("", "x@example.com");
        let err = svc
            .create_project(&anonymous, ProjectDraft::new("Launch"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "permission");
    }

    #[tokio::test]
    async fn reads_require_membership() {
        let svc = service();
        let project = svc
            .create_project(&alice(), ProjectDraft::new("Launch"))
            .await
            .unwrap();

        let err = svc
            .view_project(&UserId::new(DAVE), &project.id)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TaskflowError::Permission { reason: DenyReason::NotAMember }
        ));
        assert!(svc.list_tasks(&UserId::new(DAVE), &project.id).await.is_err());
        assert!(svc.list_projects(&UserId::new(DAVE)).await.unwrap().is_empty());

        let err = svc
            .view_project(&UserId::new(ALICE), &ProjectId::new("missing"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn pending_invite_grants_no_access() {
        let svc = service();
        let project = svc
            .create_project(&alice(), ProjectDraft::new("Launch"))
            .await
            .unwrap();
        svc.mutate(
            &UserId::new(ALICE),
            &project.id,
            Mutation::InviteMember {
                email: "bob@example.com".into(),
                role: Role::Viewer,
            },
        )
        .await
        .unwrap();

        // a pending invite does not grant access
        assert!(svc.role_in(&UserId::new(BOB), &project.id).await.is_err());
        assert_eq!(
            svc.role_in(&UserId::new(ALICE), &project.id).await.unwrap(),
            Role::Owner
        );
    }

    #[tokio::test]
    async fn accepted_invite_grants_the_invited_role() {
        let svc = service();
        let project = svc
            .create_project(&alice(), ProjectDraft::new("Launch"))
            .await
            .unwrap();
        svc.mutate(
            &UserId::new(ALICE),
            &project.id,
            Mutation::InviteMember {
                email: "bob@example.com".into(),
                role: Role::Manager,
            },
        )
        .await
        .unwrap();

        let bob = Identity::new(BOB, "BOB@example.com");
        svc.accept_invite(&bob, &project.id).await.unwrap();
        assert_eq!(
            svc.role_in(&UserId::new(BOB), &project.id).await.unwrap(),
            Role::Manager
        );

        let err = svc.accept_invite(&bob, &project.id).await.unwrap_err();
        assert_eq!(err.kind(), "conflict");

        let stranger = Identity::new(DAVE, "dave@example.com");
        let err = svc.accept_invite(&stranger, &project.id).await.unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[tokio::test]
    async fn project_layout_positions_current_tasks() {
        let svc = service();
        let alice_id = UserId::new(ALICE);
        let project = svc
            .create_project(&alice(), ProjectDraft::new("Launch"))
            .await
            .unwrap();

        let mut created: Vec<TaskId> = Vec::new();
        for (name, deps) in [("A", 0), ("B", 1)] {
            let mut draft = TaskDraft::new(name, "2024-01-01", "2024-01-02");
            draft.dependencies = created.iter().take(deps).cloned().collect();
            let outcome = svc
                .mutate(&alice_id, &project.id, Mutation::CreateTask(draft))
                .await
                .unwrap();
            if let crate::app::MutationOutcome::Task(task) = outcome {
                created.push(task.id);
            }
        }

        let diagram = svc.project_layout(&alice_id, &project.id).await.unwrap();
        assert_eq!(diagram.nodes.len(), 2);
        assert_eq!(diagram.edges.len(), 1);
        assert_eq!(diagram.position_of(&created[1]).map(|p| p.x), Some(400.0));
    }

    #[tokio::test]
    async fn projects_are_listed_most_recent_first() {
        let store = Arc::new(InMemoryStore::new());
        let early = AppBuilder::with_shared_store(Arc::clone(&store))
            .clock(Arc::new(FixedClock::new(at())))
            .build()
            .unwrap();
        let late = AppBuilder::with_shared_store(Arc::clone(&store))
            .clock(Arc::new(FixedClock::new(at() + chrono::Duration::hours(1))))
            .build()
            .unwrap();

        let first = early
            .create_project(&alice(), ProjectDraft::new("First"))
            .await
            .unwrap();
        let second = late
            .create_project(&alice(), ProjectDraft::new("Second"))
            .await
            .unwrap();

        let listed: Vec<_> = early
            .list_projects(&UserId::new(ALICE))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(listed, vec![second.id, first.id]);
    }
}
