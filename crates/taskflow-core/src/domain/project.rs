//! Project, membership and roles.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::ValidationError;
use super::ids::{ProjectId, UserId};

/// Member role. Closed set; see [`Role::RANKING`] for precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Owner,
    Manager,
    Viewer,
}

impl Role {
    /// Highest privilege first.
    pub const RANKING: [Role; 3] = [Role::Owner, Role::Manager, Role::Viewer];

    /// Position in [`Role::RANKING`]; lower is more privileged.
    pub fn rank(self) -> usize {
        Self::RANKING
            .iter()
            .position(|role| *role == self)
            .unwrap_or(Self::RANKING.len())
    }

    /// True if `self` grants at least the privileges of `required`.
    pub fn at_least(self, required: Role) -> bool {
        self.rank() <= required.rank()
    }

    /// Owners and managers may write tasks, members and project metadata.
    pub fn can_write(self) -> bool {
        self.at_least(Role::Manager)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Manager => "manager",
            Role::Viewer => "viewer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "owner" => Ok(Role::Owner),
            "manager" => Ok(Role::Manager),
            "viewer" => Ok(Role::Viewer),
            other => Err(ValidationError::UnknownRole(other.to_string())),
        }
    }
}

/// One membership entry.
///
/// `user_id` is `None` for a pending invite: the slot has a role and an email
/// but no identity that can act until the invitee claims it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(
        default,
        serialize_with = "serialize_pending",
        deserialize_with = "deserialize_pending"
    )]
    pub user_id: Option<UserId>,
    pub email: String,
    pub role: Role,
    pub invited_at: DateTime<Utc>,
    pub invited_by: UserId,
}

impl Member {
    pub fn is_pending(&self) -> bool {
        self.user_id.is_none()
    }

    /// True if this entry belongs to `actor`. Pending entries never match.
    pub fn is_identity(&self, actor: &UserId) -> bool {
        !actor.is_empty() && self.user_id.as_ref() == Some(actor)
    }
}

fn serialize_pending<S: Serializer>(id: &Option<UserId>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(id.as_ref().map(UserId::as_str).unwrap_or(""))
}

fn deserialize_pending<'de, D: Deserializer<'de>>(d: D) -> Result<Option<UserId>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.filter(|s| !s.is_empty()).map(UserId::new))
}

/// Addresses a membership entry. Pending invites have no user id, so they
/// can only be addressed by email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberRef {
    UserId(UserId),
    Email(String),
}

impl MemberRef {
    pub fn matches(&self, member: &Member) -> bool {
        match self {
            MemberRef::UserId(id) => member.is_identity(id),
            MemberRef::Email(email) => member.email.eq_ignore_ascii_case(email.trim()),
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberRef::UserId(id) => write!(f, "user_id={id}"),
            MemberRef::Email(email) => write!(f, "email={email}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner_id: UserId,
    /// Invitation order.
    #[serde(default)]
    pub members: Vec<Member>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn is_owner(&self, actor: &UserId) -> bool {
        !actor.is_empty() && &self.owner_id == actor
    }

    /// Resolved role of `actor`, or `None` if the actor is not a member.
    ///
    /// The owner id always resolves to [`Role::Owner`], whatever its
    /// membership entry says.
    pub fn role_of(&self, actor: &UserId) -> Option<Role> {
        if self.is_owner(actor) {
            return Some(Role::Owner);
        }
        self.members
            .iter()
            .find(|m| m.is_identity(actor))
            .map(|m| m.role)
    }

    pub fn find_member(&self, member: &MemberRef) -> Option<&Member> {
        self.members.iter().find(|m| member.matches(m))
    }

    pub fn find_member_mut(&mut self, member: &MemberRef) -> Option<&mut Member> {
        self.members.iter_mut().find(|m| member.matches(m))
    }

    pub fn has_email(&self, email: &str) -> bool {
        let email = email.trim();
        self.members
            .iter()
            .any(|m| m.email.eq_ignore_ascii_case(email))
    }

    /// Apply a metadata patch (trimmed). An empty name is rejected.
    pub fn apply_patch(&mut self, patch: &ProjectPatch) -> Result<(), ValidationError> {
        if let Some(name) = &patch.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ValidationError::EmptyProjectName);
            }
            self.name = name.to_string();
        }
        if let Some(description) = &patch.description {
            let description = description.trim();
            self.description = (!description.is_empty()).then(|| description.to_string());
        }
        Ok(())
    }
}

/// Payload for project creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }
}

/// Partial update of project metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// An already-authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
}

impl Identity {
    pub fn new(user_id: impl Into<UserId>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn member(user: Option<&str>, email: &str, role: Role) -> Member {
        Member {
            user_id: user.map(UserId::new),
            email: email.to_string(),
            role,
            invited_at: at(),
            invited_by: UserId::new("alice"),
        }
    }

    fn project() -> Project {
        Project {
            id: ProjectId::new("p1"),
            name: "Launch".into(),
            description: None,
            owner_id: UserId::new("alice"),
            members: vec![
                member(Some("alice"), "alice@example.com", Role::Owner),
                member(Some("bob"), "bob@example.com", Role::Manager),
                member(None, "carol@example.com", Role::Viewer),
            ],
            created_at: at(),
            updated_at: at(),
        }
    }

    #[rstest]
    #[case(Role::Owner, Role::Owner, true)]
    #[case(Role::Owner, Role::Viewer, true)]
    #[case(Role::Manager, Role::Owner, false)]
    #[case(Role::Manager, Role::Manager, true)]
    #[case(Role::Viewer, Role::Manager, false)]
    fn ranking_is_ordered(#[case] role: Role, #[case] required: Role, #[case] expected: bool) {
        assert_eq!(role.at_least(required), expected);
    }

    #[test]
    fn unknown_role_is_a_validation_error() {
        assert_eq!(
            "admin".parse::<Role>().unwrap_err(),
            ValidationError::UnknownRole("admin".into())
        );
        assert_eq!("manager".parse::<Role>().unwrap(), Role::Manager);
    }

    #[test]
    fn owner_id_wins_over_member_entry() {
        let mut p = project();
        p.members[0].role = Role::Viewer;
        assert_eq!(p.role_of(&UserId::new("alice")), Some(Role::Owner));
    }

    #[test]
    fn pending_and_empty_identities_never_resolve() {
        let p = project();
        assert_eq!(p.role_of(&UserId::new("")), None);
        assert_eq!(p.role_of(&UserId::new("mallory")), None);
        assert_eq!(p.role_of(&UserId::new("bob")), Some(Role::Manager));
    }

    #[test]
    fn pending_member_serializes_with_empty_user_id() {
        let m = member(None, "carol@example.com", Role::Viewer);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["userId"], "");
        assert_eq!(json["role"], "viewer");

        let back: Member = serde_json::from_value(json).unwrap();
        assert!(back.is_pending());
    }

    #[test]
    fn members_are_addressable_by_email_case_insensitively() {
        let p = project();
        let found = p.find_member(&MemberRef::Email("Carol@Example.com".into()));
        assert!(found.is_some_and(Member::is_pending));
        assert!(p.has_email(" BOB@example.com "));
    }

    #[test]
    fn patch_trims_and_rejects_empty_name() {
        let mut p = project();
        let patch = ProjectPatch {
            name: Some("  Relaunch ".into()),
            description: Some(" v2 ".into()),
        };
        p.apply_patch(&patch).unwrap();
        assert_eq!(p.name, "Relaunch");
        assert_eq!(p.description.as_deref(), Some("v2"));

        let empty = ProjectPatch {
            name: Some("   ".into()),
            description: None,
        };
        assert_eq!(
            p.apply_patch(&empty).unwrap_err(),
            ValidationError::EmptyProjectName
        );
        assert_eq!(p.name, "Relaunch");
    }
}
