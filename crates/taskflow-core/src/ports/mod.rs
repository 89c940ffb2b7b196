//! Ports: the seams to storage, time and id generation.
//!
//! The document store behind `TaskStore`/`ProjectStore` is an external
//! collaborator; `impls::InMemoryStore` is the adapter used by tests and the
//! CLI.

pub mod clock;
pub mod id_generator;
pub mod project_store;
pub mod task_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::project_store::ProjectStore;
pub use self::task_store::TaskStore;
