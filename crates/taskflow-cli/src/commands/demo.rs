//! `taskflow demo`: a scripted session through the mutation gate.
//!
//! Alice owns the project, Bob is a manager and Carol a viewer. Every step
//! prints whether the gate applied or refused it.

use anyhow::Result;

use taskflow_core::app::{Mutation, MutationOutcome, ProjectService};
use taskflow_core::config::AppConfig;
use taskflow_core::domain::{
    Identity, MemberRef, ProjectDraft, ProjectId, Role, TaskDraft, TaskId, UserId,
};
use taskflow_core::impls::InMemoryStore;
use taskflow_core::{AppBuilder, TaskflowError, compute_levels};

pub async fn run(config: &AppConfig) -> Result<()> {
    let service = AppBuilder::new(InMemoryStore::new())
        .layout(config.layout)
        .build()?;

    let alice = Identity::new("alice", "alice@example.com");
    let bob = Identity::new("bob", "bob@example.com");
    let carol = Identity::new("carol", "carol@example.com");

    let project = service
        .create_project(&alice, ProjectDraft::new("Website relaunch"))
        .await?;
    println!("created project {} owned by {}", project.id, alice.user_id);

    for (who, role) in [(&bob, Role::Manager), (&carol, Role::Viewer)] {
        let invite = Mutation::InviteMember {
            email: who.email.clone(),
            role,
        };
        report("invite", &who.email, service.mutate(&alice.user_id, &project.id, invite).await);
        service.accept_invite(who, &project.id).await?;
    }

    let design = create(&service, &alice.user_id, &project.id, "Design", &[]).await?;
    let backend = create(&service, &bob.user_id, &project.id, "Backend", &[&design]).await?;
    let frontend = create(&service, &bob.user_id, &project.id, "Frontend", &[&design]).await?;
    create(&service, &bob.user_id, &project.id, "Launch", &[&backend, &frontend]).await?;

    let attempt = Mutation::CreateTask(TaskDraft::new("Sneaky", "2025-03-01", "2025-03-02"));
    report("create task", "carol", service.mutate(&carol.user_id, &project.id, attempt).await);

    let attempt = Mutation::RemoveMember {
        member: MemberRef::UserId(alice.user_id.clone()),
    };
    report("remove owner", "bob", service.mutate(&bob.user_id, &project.id, attempt).await);

    report(
        "delete project",
        "bob",
        service.mutate(&bob.user_id, &project.id, Mutation::DeleteProject).await,
    );

    print_levels(&service, &alice.user_id, &project.id).await?;

    let delete = Mutation::DeleteTask { task_id: design };
    report("delete task", "bob", service.mutate(&bob.user_id, &project.id, delete).await);

    print_levels(&service, &alice.user_id, &project.id).await?;

    let diagram = service.project_layout(&carol.user_id, &project.id).await?;
    println!("{}", serde_json::to_string_pretty(&diagram)?);
    Ok(())
}

async fn create(
    service: &ProjectService<InMemoryStore>,
    actor: &UserId,
    project_id: &ProjectId,
    name: &str,
    deps: &[&TaskId],
) -> Result<TaskId> {
    let draft = TaskDraft::new(name, "2025-03-01", "2025-03-14").depends_on(deps);
    match service.mutate(actor, project_id, Mutation::CreateTask(draft)).await? {
        MutationOutcome::Task(task) => {
            println!("{actor} created task {} ({})", task.name, task.id);
            Ok(task.id)
        }
        other => anyhow::bail!("unexpected outcome for task creation: {other:?}"),
    }
}

fn report(action: &str, subject: &str, result: taskflow_core::Result<MutationOutcome>) {
    match result {
        Ok(MutationOutcome::TaskDeleted { detached, .. }) => {
            println!("{action} ({subject}): applied (detached from {} task(s))", detached.len());
        }
        Ok(_) => println!("{action} ({subject}): applied"),
        Err(err @ TaskflowError::Permission { .. }) | Err(err @ TaskflowError::Conflict(_)) => {
            println!("{action} ({subject}): refused [{}] {err}", err.kind());
        }
        Err(err) => println!("{action} ({subject}): failed [{}] {err}", err.kind()),
    }
}

async fn print_levels(
    service: &ProjectService<InMemoryStore>,
    actor: &UserId,
    project_id: &ProjectId,
) -> Result<()> {
    let tasks = service.list_tasks(actor, project_id).await?;
    let levels = compute_levels(&tasks);
    for task in &tasks {
        let level = levels.get(&task.id).copied().unwrap_or(0);
        println!("  level {level}: {}", task.name);
    }
    Ok(())
}
