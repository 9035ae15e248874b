//! Stale-location detector.
//!
//! A background daemon that sweeps the position store on a fixed cadence
//! and alerts for every entity that has stopped reporting. The sweep is
//! clock-driven on purpose: the geofence check only runs when a report
//! arrives, so a silent entity would otherwise never be noticed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::directory::{AssignmentDirectory, RoleClass};
use crate::notify::{AlertDispatcher, AlertRequest};
use crate::position::PositionStore;

use super::throttle::AlertThrottle;

/// Title of every staleness alert.
pub const STALE_ALERT_TITLE: &str = "Location Update Alert";

/// Default sweep cadence and staleness threshold.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Default cool-down between staleness alerts for the same entity.
pub const DEFAULT_STALE_COOLDOWN: Duration = Duration::from_secs(60);

/// Configuration for the staleness monitor.
///
/// One interval governs both the sweep cadence and the staleness
/// threshold by default; each can be overridden independently. The
/// cool-down is separate from the breach-alert cool-down.
#[derive(Debug, Clone)]
pub struct StalenessMonitorConfig {
    /// How often the sweep runs.
    pub sweep_interval: Duration,
    /// Age beyond which an entity counts as stale.
    pub stale_after: Duration,
    /// Minimum gap between staleness alerts for the same entity.
    pub alert_cooldown: Duration,
}

impl Default for StalenessMonitorConfig {
    fn default() -> Self {
        Self {
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            stale_after: DEFAULT_SWEEP_INTERVAL,
            alert_cooldown: DEFAULT_STALE_COOLDOWN,
        }
    }
}

impl StalenessMonitorConfig {
    /// Config with a single interval governing both cadence and threshold.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            sweep_interval: interval,
            stale_after: interval,
            ..Self::default()
        }
    }
}

/// Background daemon that flags entities that have stopped reporting.
///
/// Reads the position store and the assignment directory, applies a
/// per-entity cool-down, and submits alerts through the dispatcher. A
/// lookup failure for one entity never aborts the sweep.
pub struct StalenessMonitor {
    store: Arc<PositionStore>,
    directory: Arc<dyn AssignmentDirectory>,
    dispatcher: AlertDispatcher,
    throttle: AlertThrottle<String>,
    config: StalenessMonitorConfig,
}

impl StalenessMonitor {
    /// Create a monitor with default settings.
    pub fn new(
        store: Arc<PositionStore>,
        directory: Arc<dyn AssignmentDirectory>,
        dispatcher: AlertDispatcher,
    ) -> Self {
        Self::with_config(store, directory, dispatcher, StalenessMonitorConfig::default())
    }

    /// Create a monitor with custom settings.
    pub fn with_config(
        store: Arc<PositionStore>,
        directory: Arc<dyn AssignmentDirectory>,
        dispatcher: AlertDispatcher,
        config: StalenessMonitorConfig,
    ) -> Self {
        let throttle = AlertThrottle::new(config.alert_cooldown);
        Self {
            store,
            directory,
            dispatcher,
            throttle,
            config,
        }
    }

    /// Run the sweep loop until shutdown is signalled.
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            sweep_interval_secs = self.config.sweep_interval.as_secs(),
            stale_after_secs = self.config.stale_after.as_secs(),
            cooldown_secs = self.config.alert_cooldown.as_secs(),
            "Staleness monitor starting"
        );

        let mut interval = tokio::time::interval(self.config.sweep_interval);
        // Skip the first immediate tick
        interval.tick().await;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("Staleness monitor shutting down");
                    break;
                }

                _ = interval.tick() => {
                    self.sweep(Instant::now());
                }
            }
        }
    }

    /// Sweep every tracked entity once, alerting for stale ones.
    ///
    /// Public so the cadence can be driven externally in tests.
    pub fn sweep(&self, now: Instant) {
        let entities = self.store.tracked_entities();
        debug!(tracked = entities.len(), "Staleness sweep starting");

        let mut flagged = 0usize;
        for entity_id in entities {
            if self.check_entity(&entity_id, now) {
                flagged += 1;
            }
        }

        debug!(flagged, "Staleness sweep finished");
    }

    /// Check one entity; returns true if an alert was submitted.
    fn check_entity(&self, entity_id: &str, now: Instant) -> bool {
        let Some(last_seen) = self.store.last_seen_at(entity_id) else {
            return false;
        };
        if now.saturating_duration_since(last_seen) <= self.config.stale_after {
            return false;
        }

        let role = match self.directory.classify(entity_id) {
            Ok(role) => role,
            Err(err) => {
                warn!(entity = entity_id, error = %err, "Role lookup failed, skipping entity");
                return false;
            }
        };

        // Supervisors are addressed directly; subordinates carry their
        // supervisor's name as context. Unassigned entities are skipped.
        let (recipient_id, supervisor_name, entity_name) = match role {
            RoleClass::Supervisor(assignment) => {
                if assignment.subordinates.is_empty() {
                    debug!(entity = entity_id, "Supervisor has no subordinates, not flagged");
                    return false;
                }
                let name = assignment.supervisor_name.clone();
                (entity_id.to_string(), name.clone(), name)
            }
            RoleClass::Subordinate(assignment) => {
                let name = match self.directory.resolve_name(entity_id) {
                    Ok(Some(name)) => name,
                    Ok(None) => {
                        debug!(entity = entity_id, "Entity name unknown, skipping alert");
                        return false;
                    }
                    Err(err) => {
                        warn!(entity = entity_id, error = %err, "Name lookup failed, skipping entity");
                        return false;
                    }
                };
                (
                    entity_id.to_string(),
                    assignment.supervisor_name.clone(),
                    name,
                )
            }
            RoleClass::Unknown => {
                debug!(entity = entity_id, "Entity has no assignment, not flagged");
                return false;
            }
        };

        if !self.throttle.try_acquire(entity_id.to_string(), now) {
            debug!(entity = entity_id, "Staleness alert within cool-down, suppressed");
            return false;
        }

        let body = format!("{}, not sending location updates", entity_name);
        info!(
            entity = entity_id,
            stale_for_secs = now.saturating_duration_since(last_seen).as_secs(),
            "Entity stopped reporting, submitting alert"
        );
        self.dispatcher.try_submit(AlertRequest::new(
            &recipient_id,
            STALE_ALERT_TITLE,
            &body,
            &supervisor_name,
            &entity_name,
        ));
        true
    }
}
