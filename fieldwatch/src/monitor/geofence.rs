//! Geofence breach monitor.
//!
//! Runs synchronously after every accepted position report. Resolves the
//! reporting entity's role, computes the distance for each affected
//! supervisor/subordinate pair, and submits a breach alert when a pair is
//! at or beyond the configured radius and its cool-down allows.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::directory::{Assignment, AssignmentDirectory, RoleClass};
use crate::geo::distance_meters;
use crate::notify::{AlertDispatcher, AlertRequest};
use crate::position::PositionStore;

use super::throttle::AlertThrottle;

/// Title of every breach alert.
pub const BREACH_ALERT_TITLE: &str = "Out of Radius Alert";

/// Body of every breach alert.
pub const BREACH_ALERT_BODY: &str = "You are out of the designated radius.";

/// Default cool-down between breach alerts for the same pair.
pub const DEFAULT_BREACH_COOLDOWN: Duration = Duration::from_secs(60);

/// Evaluates geofence containment on every position report.
///
/// Holds a per-pair [`AlertThrottle`] keyed by
/// `(supervisor_id, subordinate_id)` so a pair alerts at most once per
/// cool-down window. All collaborator failures degrade to "no alert":
/// a directory error skips the entity, a missing position or name skips
/// the pair, and a failed pair never prevents evaluating the rest.
pub struct GeofenceMonitor {
    store: Arc<PositionStore>,
    directory: Arc<dyn AssignmentDirectory>,
    dispatcher: AlertDispatcher,
    throttle: AlertThrottle<(String, String)>,
}

impl GeofenceMonitor {
    /// Create a monitor with the default breach cool-down.
    pub fn new(
        store: Arc<PositionStore>,
        directory: Arc<dyn AssignmentDirectory>,
        dispatcher: AlertDispatcher,
    ) -> Self {
        Self::with_cooldown(store, directory, dispatcher, DEFAULT_BREACH_COOLDOWN)
    }

    /// Create a monitor with a custom breach cool-down.
    pub fn with_cooldown(
        store: Arc<PositionStore>,
        directory: Arc<dyn AssignmentDirectory>,
        dispatcher: AlertDispatcher,
        cooldown: Duration,
    ) -> Self {
        Self {
            store,
            directory,
            dispatcher,
            throttle: AlertThrottle::new(cooldown),
        }
    }

    /// Evaluate all pairs affected by a position report from `entity_id`.
    ///
    /// Call after the report has been written to the store so both ends
    /// of each pair read consistently from it.
    pub fn evaluate(&self, entity_id: &str, now: Instant) {
        let role = match self.directory.classify(entity_id) {
            Ok(role) => role,
            Err(err) => {
                warn!(entity = entity_id, error = %err, "Role lookup failed, skipping geofence check");
                return;
            }
        };

        match role {
            RoleClass::Supervisor(assignment) => {
                for subordinate in &assignment.subordinates {
                    self.check_pair(&assignment, &subordinate.id, now);
                }
            }
            RoleClass::Subordinate(assignment) => {
                self.check_pair(&assignment, entity_id, now);
            }
            RoleClass::Unknown => {
                debug!(entity = entity_id, "Entity has no assignment, no geofence check");
            }
        }
    }

    /// Check one supervisor/subordinate pair and alert on breach.
    fn check_pair(&self, assignment: &Assignment, subordinate_id: &str, now: Instant) {
        let supervisor_id = assignment.supervisor_id.as_str();

        let Some(supervisor_pos) = self.store.coordinate(supervisor_id) else {
            debug!(
                supervisor = supervisor_id,
                subordinate = subordinate_id,
                "Supervisor position not yet known, skipping pair"
            );
            return;
        };
        let Some(subordinate_pos) = self.store.coordinate(subordinate_id) else {
            debug!(
                supervisor = supervisor_id,
                subordinate = subordinate_id,
                "Subordinate position not yet known, skipping pair"
            );
            return;
        };

        let distance = distance_meters(supervisor_pos, subordinate_pos);
        debug!(
            supervisor = supervisor_id,
            subordinate = subordinate_id,
            distance_m = distance,
            radius_m = assignment.radius_meters,
            "Pair distance computed"
        );

        // Inclusive boundary: exactly at the radius counts as a breach.
        // NaN distances compare false and fall through to no alert.
        if !(distance >= assignment.radius_meters) {
            return;
        }

        let supervisor_name = match self.directory.resolve_name(supervisor_id) {
            Ok(Some(name)) => name,
            Ok(None) => {
                debug!(supervisor = supervisor_id, "Supervisor name unknown, skipping alert");
                return;
            }
            Err(err) => {
                warn!(supervisor = supervisor_id, error = %err, "Name lookup failed, skipping alert");
                return;
            }
        };
        let subordinate_name = match self.directory.resolve_name(subordinate_id) {
            Ok(Some(name)) => name,
            Ok(None) => {
                debug!(subordinate = subordinate_id, "Subordinate name unknown, skipping alert");
                return;
            }
            Err(err) => {
                warn!(subordinate = subordinate_id, error = %err, "Name lookup failed, skipping alert");
                return;
            }
        };

        let pair_key = (supervisor_id.to_string(), subordinate_id.to_string());
        if !self.throttle.try_acquire(pair_key, now) {
            debug!(
                supervisor = supervisor_id,
                subordinate = subordinate_id,
                "Breach within cool-down window, alert suppressed"
            );
            return;
        }

        debug!(
            supervisor = supervisor_id,
            subordinate = subordinate_id,
            distance_m = distance,
            "Radius breach, submitting alert"
        );
        self.dispatcher.try_submit(AlertRequest::new(
            subordinate_id,
            BREACH_ALERT_TITLE,
            BREACH_ALERT_BODY,
            &supervisor_name,
            &subordinate_name,
        ));
    }
}
