//! Role and assignment directory.
//!
//! The tracking core does not own who supervises whom; it consults an
//! [`AssignmentDirectory`] that answers three questions:
//!
//! - Is this entity a supervisor, and what is its assignment set?
//! - Is this entity a subordinate, and who is its supervisor?
//! - What is this entity's display name?
//!
//! The three-way role decision is expressed as a single [`RoleClass`]
//! variant so monitor branches are exhaustive and type-checked.
//!
//! [`InMemoryDirectory`] is the bundled implementation used by the CLI
//! and the test suites; production deployments are expected to back the
//! trait with their own roster storage.

mod memory;

pub use memory::InMemoryDirectory;

use thiserror::Error;

/// A subordinate entry within a supervisor's assignment set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subordinate {
    /// Subordinate entity id.
    pub id: String,
    /// Subordinate display name.
    pub name: String,
}

/// A supervisor's assignment: radius and subordinate set.
///
/// A subordinate appears in at most one supervisor's assignment at a
/// time. The directory enforces that invariant; the core assumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Supervisor entity id.
    pub supervisor_id: String,
    /// Supervisor display name.
    pub supervisor_name: String,
    /// Monitoring radius in meters.
    pub radius_meters: f64,
    /// Assigned subordinates.
    pub subordinates: Vec<Subordinate>,
}

impl Assignment {
    /// True if the given entity id is in this assignment's subordinate set.
    pub fn has_subordinate(&self, entity_id: &str) -> bool {
        self.subordinates.iter().any(|s| s.id == entity_id)
    }
}

/// Classification of an entity's role in the directory.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleClass {
    /// Entity supervises the contained assignment.
    Supervisor(Assignment),
    /// Entity is a subordinate within the contained assignment.
    Subordinate(Assignment),
    /// Entity is neither a supervisor nor an assigned subordinate.
    Unknown,
}

/// Errors from directory lookups.
///
/// Lookup failures never abort a monitor pass; they are logged and the
/// affected entity is skipped.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The backing store could not be reached.
    #[error("directory backend unavailable: {0}")]
    Unavailable(String),
    /// The backing store returned malformed data.
    #[error("malformed directory record for {entity_id}: {reason}")]
    MalformedRecord { entity_id: String, reason: String },
}

/// Read-only view of supervisor/subordinate assignments.
pub trait AssignmentDirectory: Send + Sync {
    /// Classify an entity as supervisor, subordinate, or unknown.
    fn classify(&self, entity_id: &str) -> Result<RoleClass, DirectoryError>;

    /// The entity's own assignment if it is a supervisor.
    fn find_as_supervisor(&self, entity_id: &str) -> Result<Option<Assignment>, DirectoryError>;

    /// The assignment the entity belongs to if it is a subordinate.
    fn find_supervisor_of(&self, entity_id: &str) -> Result<Option<Assignment>, DirectoryError>;

    /// Display name for an entity, if registered.
    fn resolve_name(&self, entity_id: &str) -> Result<Option<String>, DirectoryError>;
}
