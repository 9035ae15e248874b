//! Breach and staleness monitors.
//!
//! - [`GeofenceMonitor`] runs synchronously after every position report
//!   and raises an alert when a subordinate is at or beyond its
//!   supervisor's radius.
//! - [`StalenessMonitor`] sweeps the position store on a fixed cadence
//!   and flags entities that have stopped reporting.
//! - [`AlertThrottle`] is the shared cool-down discipline: at most one
//!   alert per key per window.

mod geofence;
mod staleness;
mod throttle;

pub use geofence::{
    GeofenceMonitor, BREACH_ALERT_BODY, BREACH_ALERT_TITLE, DEFAULT_BREACH_COOLDOWN,
};
pub use staleness::{
    StalenessMonitor, StalenessMonitorConfig, DEFAULT_STALE_COOLDOWN, DEFAULT_SWEEP_INTERVAL,
    STALE_ALERT_TITLE,
};
pub use throttle::AlertThrottle;
