//! Access Policy Evaluator.
//!
//! `evaluate_access` is a pure decision function. It never touches storage;
//! the mutation gate performs the effect when the decision is `Allow`.
//!
//! Evaluation order:
//! 1. membership (fail closed: empty and pending identities never match)
//! 2. owner protection for member removal / role change targeting the owner
//! 3. project deletion requires the exact owner id
//! 4. minimum role for the operation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Project, Role, UserId};

/// Operation kinds the policy knows about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// View the project and list its tasks.
    View,
    CreateTask,
    UpdateTask,
    DeleteTask,
    UpdateProject,
    InviteMember,
    /// `target` is the user id of the member to remove, `None` for a pending
    /// invite.
    RemoveMember { target: Option<UserId> },
    ChangeMemberRole { target: Option<UserId> },
    DeleteProject,
}

impl Operation {
    /// Minimum role, or `None` if any member may perform it.
    pub fn minimum_role(&self) -> Option<Role> {
        match self {
            Operation::View => None,
            Operation::DeleteProject => Some(Role::Owner),
            Operation::CreateTask
            | Operation::UpdateTask
            | Operation::DeleteTask
            | Operation::UpdateProject
            | Operation::InviteMember
            | Operation::RemoveMember { .. }
            | Operation::ChangeMemberRole { .. } => Some(Role::Manager),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::View => "view",
            Operation::CreateTask => "create_task",
            Operation::UpdateTask => "update_task",
            Operation::DeleteTask => "delete_task",
            Operation::UpdateProject => "update_project",
            Operation::InviteMember => "invite_member",
            Operation::RemoveMember { .. } => "remove_member",
            Operation::ChangeMemberRole { .. } => "change_member_role",
            Operation::DeleteProject => "delete_project",
        }
    }

    fn targets_owner(&self, project: &Project) -> bool {
        match self {
            Operation::RemoveMember { target } | Operation::ChangeMemberRole { target } => target
                .as_ref()
                .is_some_and(|target| project.is_owner(target)),
            _ => false,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    NotAMember,
    InsufficientRole,
    OwnerProtected,
}

impl DenyReason {
    pub fn as_str(self) -> &'static str {
        match self {
            DenyReason::NotAMember => "not_a_member",
            DenyReason::InsufficientRole => "insufficient_role",
            DenyReason::OwnerProtected => "owner_protected",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    /// Allowed, carrying the actor's resolved role.
    Allow { role: Role },
    Deny { reason: DenyReason },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow { .. })
    }
}

/// Decide whether `actor` may perform `operation` on `project`.
pub fn evaluate_access(actor: &UserId, project: &Project, operation: &Operation) -> AccessDecision {
    let Some(role) = project.role_of(actor) else {
        return AccessDecision::Deny { reason: DenyReason::NotAMember };
    };

    if operation.targets_owner(project) {
        return AccessDecision::Deny { reason: DenyReason::OwnerProtected };
    }

    if matches!(operation, Operation::DeleteProject) && !project.is_owner(actor) {
        return AccessDecision::Deny { reason: DenyReason::InsufficientRole };
    }

    match operation.minimum_role() {
        Some(required) if !role.at_least(required) => {
            AccessDecision::Deny { reason: DenyReason::InsufficientRole }
        }
        _ => AccessDecision::Allow { role },
    }
}
