//! In-memory assignment directory.
//!
//! A [`DashMap`]-backed roster suitable for the CLI runner and tests.
//! Supervisor assignments are keyed by supervisor id; display names are
//! kept in a separate registry so subordinates without an assignment can
//! still be named.

use dashmap::DashMap;

use super::{Assignment, AssignmentDirectory, DirectoryError, RoleClass, Subordinate};

/// Thread-safe in-memory implementation of [`AssignmentDirectory`].
///
/// Enforces the single-assignment invariant on write: assigning a
/// subordinate removes it from any other supervisor's set.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    assignments: DashMap<String, Assignment>,
    names: DashMap<String, String>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self {
            assignments: DashMap::new(),
            names: DashMap::new(),
        }
    }

    /// Register an entity's display name.
    pub fn register_name(&self, entity_id: &str, name: &str) {
        self.names.insert(entity_id.to_string(), name.to_string());
    }

    /// Create or replace a supervisor with the given radius and an empty
    /// assignment set. Also registers the supervisor's name.
    pub fn upsert_supervisor(&self, supervisor_id: &str, name: &str, radius_meters: f64) {
        self.register_name(supervisor_id, name);
        self.assignments
            .entry(supervisor_id.to_string())
            .and_modify(|a| {
                a.supervisor_name = name.to_string();
                a.radius_meters = radius_meters;
            })
            .or_insert_with(|| Assignment {
                supervisor_id: supervisor_id.to_string(),
                supervisor_name: name.to_string(),
                radius_meters,
                subordinates: Vec::new(),
            });
    }

    /// Assign a subordinate to a supervisor.
    ///
    /// Removes the subordinate from any other supervisor's set first, so
    /// an entity belongs to at most one assignment at a time. Returns an
    /// error if the supervisor does not exist.
    pub fn assign(
        &self,
        supervisor_id: &str,
        subordinate_id: &str,
        subordinate_name: &str,
    ) -> Result<(), DirectoryError> {
        if !self.assignments.contains_key(supervisor_id) {
            return Err(DirectoryError::MalformedRecord {
                entity_id: supervisor_id.to_string(),
                reason: "no such supervisor".to_string(),
            });
        }

        // Single-assignment invariant: detach from any previous supervisor.
        for mut entry in self.assignments.iter_mut() {
            entry.subordinates.retain(|s| s.id != subordinate_id);
        }

        self.register_name(subordinate_id, subordinate_name);
        if let Some(mut assignment) = self.assignments.get_mut(supervisor_id) {
            assignment.subordinates.push(Subordinate {
                id: subordinate_id.to_string(),
                name: subordinate_name.to_string(),
            });
        }
        Ok(())
    }

    /// Remove a subordinate from whichever supervisor holds it.
    pub fn unassign(&self, subordinate_id: &str) {
        for mut entry in self.assignments.iter_mut() {
            entry.subordinates.retain(|s| s.id != subordinate_id);
        }
    }

    /// Remove a supervisor and its whole assignment set.
    pub fn remove_supervisor(&self, supervisor_id: &str) {
        self.assignments.remove(supervisor_id);
    }

    /// Number of supervisors with an assignment record.
    pub fn supervisor_count(&self) -> usize {
        self.assignments.len()
    }
}

impl AssignmentDirectory for InMemoryDirectory {
    fn classify(&self, entity_id: &str) -> Result<RoleClass, DirectoryError> {
        if let Some(assignment) = self.assignments.get(entity_id) {
            return Ok(RoleClass::Supervisor(assignment.value().clone()));
        }
        // Scan assignment sets for a subordinate match. First match wins;
        // the write path keeps membership unique so at most one exists.
        for entry in self.assignments.iter() {
            if entry.has_subordinate(entity_id) {
                return Ok(RoleClass::Subordinate(entry.value().clone()));
            }
        }
        Ok(RoleClass::Unknown)
    }

    fn find_as_supervisor(&self, entity_id: &str) -> Result<Option<Assignment>, DirectoryError> {
        Ok(self.assignments.get(entity_id).map(|a| a.value().clone()))
    }

    fn find_supervisor_of(&self, entity_id: &str) -> Result<Option<Assignment>, DirectoryError> {
        for entry in self.assignments.iter() {
            if entry.has_subordinate(entity_id) {
                return Ok(Some(entry.value().clone()));
            }
        }
        Ok(None)
    }

    fn resolve_name(&self, entity_id: &str) -> Result<Option<String>, DirectoryError> {
        Ok(self.names.get(entity_id).map(|n| n.value().clone()))
    }
}
