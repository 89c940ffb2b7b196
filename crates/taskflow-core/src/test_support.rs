//! Fixtures shared by unit tests.

use chrono::{DateTime, TimeZone, Utc};

use crate::domain::{Member, Project, ProjectId, Role, Task, TaskId, TaskStatus, UserId};

pub const ALICE: &str = "alice";
pub const BOB: &str = "bob";
pub const CAROL: &str = "carol";
pub const DAVE: &str = "dave";

pub fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// Task with the given id and dependency ids; other fields are filler.
pub fn task(id: &str, deps: &[&str]) -> Task {
    let day = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    Task {
        id: TaskId::new(id),
        project_id: ProjectId::new("p1"),
        name: id.to_uppercase(),
        description: None,
        start_date: day,
        end_date: day,
        status: TaskStatus::NotStarted,
        dependencies: deps.iter().map(|d| TaskId::new(*d)).collect(),
        assigned_to: None,
        completion_image: None,
        created_by: UserId::new(ALICE),
        updated_by: UserId::new(ALICE),
        created_at: at(),
        updated_at: at(),
    }
}

pub fn member(user: &str, role: Role) -> Member {
    Member {
        user_id: Some(UserId::new(user)),
        email: format!("{user}@example.com"),
        role,
        invited_at: at(),
        invited_by: UserId::new(ALICE),
    }
}

pub fn pending_member(email: &str) -> Member {
    Member {
        user_id: None,
        email: email.to_string(),
        role: Role::Viewer,
        invited_at: at(),
        invited_by: UserId::new(ALICE),
    }
}

/// Project owned by ALICE with the given extra members.
pub fn project_with(members: &[(&str, Role)]) -> Project {
    let mut all = vec![member(ALICE, Role::Owner)];
    all.extend(members.iter().map(|(user, role)| member(user, *role)));
    Project {
        id: ProjectId::new("p1"),
        name: "Launch".into(),
        description: None,
        owner_id: UserId::new(ALICE),
        members: all,
        created_at: at(),
        updated_at: at(),
    }
}
