//! Domain identifiers (strongly-typed IDs).
//!
//! Every identifier is an opaque string at the boundary. Ids that come from
//! outside (the identity provider, a document store, an imported file) are
//! accepted verbatim. Ids minted by this crate are `<prefix><ULID>`, which
//! keeps them sortable by creation time.
//!
//! `Id<T>` is generic over a zero-sized marker so that a `TaskId` can never be
//! passed where a `ProjectId` or `UserId` is expected. The marker costs no
//! memory and exists only at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// IdMarker is implemented by each id's marker type.
pub trait IdMarker: Send + Sync + 'static {
    /// Prefix used when this crate mints a fresh id (e.g. "task-").
    fn prefix() -> &'static str;
}

/// Generic string-backed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    value: String,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    /// Wrap an externally supplied id.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    /// Mint an id from a ULID, using the marker's prefix.
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self::new(format!("{}{}", T::prefix(), ulid))
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl<T: IdMarker> From<&str> for Id<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> From<String> for Id<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

// ========================================
// Marker types
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Task {}

impl IdMarker for Task {
    fn prefix() -> &'static str {
        "task-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Project {}

impl IdMarker for Project {
    fn prefix() -> &'static str {
        "project-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum User {}

impl IdMarker for User {
    fn prefix() -> &'static str {
        "user-"
    }
}

/// Identifier of a Task (unique within its project).
pub type TaskId = Id<Task>;

/// Identifier of a Project.
pub type ProjectId = Id<Project>;

/// Identity of an actor, as resolved by the authentication layer.
pub type UserId = Id<User>;
