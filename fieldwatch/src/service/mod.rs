//! Service facade.
//!
//! [`TrackerService::build`] wires the store, monitors, dispatcher and
//! broadcast channel together from a directory and a notifier. The
//! returned parts are explicitly owned: the caller holds the
//! [`LiveTracker`] entry point and decides where the staleness daemon
//! and dispatch worker run.
//!
//! # Data flow
//!
//! ```text
//! report ──> PositionStore ──> GeofenceMonitor ──> AlertDispatcher ──> Notifier
//!                 │                                        ▲
//!                 │                                        │
//!                 └──> broadcast observers    StalenessMonitor (periodic)
//! ```

mod config;

pub use config::{TrackerConfig, DEFAULT_BROADCAST_CAPACITY};

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;
use tracing::debug;

use crate::directory::AssignmentDirectory;
use crate::geo::Coordinate;
use crate::monitor::{GeofenceMonitor, StalenessMonitor};
use crate::notify::{AlertDispatcher, DispatchWorker, Notifier};
use crate::position::PositionStore;

/// An accepted position update, echoed verbatim to all observers.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionUpdate {
    /// Reporting entity id.
    pub entity_id: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

/// Entry point for inbound position reports.
///
/// Every accepted report is written to the store, evaluated for geofence
/// breaches, and fanned out to all broadcast subscribers in that order.
/// The fan-out is a pure side channel: it happens regardless of the
/// evaluation outcome, and a lagging observer never affects the others
/// or the core decision logic.
#[derive(Clone)]
pub struct LiveTracker {
    store: Arc<PositionStore>,
    geofence: Arc<GeofenceMonitor>,
    broadcast_tx: broadcast::Sender<PositionUpdate>,
}

impl LiveTracker {
    /// Record a position report from an entity.
    ///
    /// Coordinates are stored as given; validation is the producer's
    /// concern and malformed values degrade to non-breach downstream.
    pub fn record_position(&self, entity_id: &str, latitude: f64, longitude: f64) {
        let now = Instant::now();
        let coordinate = Coordinate::new(latitude, longitude);

        self.store.record(entity_id, coordinate, now);
        self.geofence.evaluate(entity_id, now);

        // Fan out after evaluation; errors only mean no receivers.
        let _ = self.broadcast_tx.send(PositionUpdate {
            entity_id: entity_id.to_string(),
            latitude,
            longitude,
        });
        debug!(entity = entity_id, latitude, longitude, "Position recorded");
    }

    /// Subscribe to the fan-out of accepted position updates.
    pub fn subscribe(&self) -> broadcast::Receiver<PositionUpdate> {
        self.broadcast_tx.subscribe()
    }

    /// The shared position store.
    pub fn store(&self) -> &Arc<PositionStore> {
        &self.store
    }
}

/// Assembled tracking service parts.
///
/// `tracker` handles inbound reports; `staleness` and `dispatch_worker`
/// are long-running loops the caller spawns (typically with
/// `tokio::spawn(part.run(shutdown))`).
pub struct TrackerService {
    /// Inbound report entry point.
    pub tracker: LiveTracker,
    /// Periodic stale-location detector.
    pub staleness: StalenessMonitor,
    /// Alert delivery worker.
    pub dispatch_worker: DispatchWorker,
}

impl TrackerService {
    /// Wire a complete service from a directory and a notifier.
    pub fn build(
        directory: Arc<dyn AssignmentDirectory>,
        notifier: Arc<dyn Notifier>,
        config: TrackerConfig,
    ) -> Self {
        let store = Arc::new(PositionStore::new());
        let (dispatcher, dispatch_worker) =
            AlertDispatcher::with_config(notifier, config.dispatcher_config());

        let geofence = Arc::new(GeofenceMonitor::with_cooldown(
            store.clone(),
            directory.clone(),
            dispatcher.clone(),
            config.breach_cooldown,
        ));
        let staleness = StalenessMonitor::with_config(
            store.clone(),
            directory,
            dispatcher,
            config.staleness_config(),
        );

        let (broadcast_tx, _) = broadcast::channel(config.broadcast_capacity.max(1));

        Self {
            tracker: LiveTracker {
                store,
                geofence,
                broadcast_tx,
            },
            staleness,
            dispatch_worker,
        }
    }
}
