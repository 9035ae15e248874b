//! Tracker service configuration.

use std::time::Duration;

use crate::monitor::StalenessMonitorConfig;
use crate::notify::AlertDispatcherConfig;

/// Default broadcast channel capacity.
pub const DEFAULT_BROADCAST_CAPACITY: usize = 64;

/// Configuration for a [`crate::service::TrackerService`].
///
/// A single `sweep_interval` governs both the staleness sweep cadence and
/// the staleness threshold; the breach cool-down is independent.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Cool-down between breach alerts for the same pair.
    pub breach_cooldown: Duration,
    /// Staleness sweep cadence, also the staleness threshold.
    pub sweep_interval: Duration,
    /// Age beyond which an entity counts as stale.
    pub stale_after: Duration,
    /// Cool-down between staleness alerts for the same entity.
    pub stale_alert_cooldown: Duration,
    /// Capacity of the position broadcast channel.
    pub broadcast_capacity: usize,
    /// Depth of the alert submission queue.
    pub alert_queue_depth: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            breach_cooldown: Duration::from_secs(60),
            sweep_interval: Duration::from_secs(60),
            stale_after: Duration::from_secs(60),
            stale_alert_cooldown: Duration::from_secs(60),
            broadcast_capacity: DEFAULT_BROADCAST_CAPACITY,
            alert_queue_depth: crate::notify::DEFAULT_QUEUE_DEPTH,
        }
    }
}

impl TrackerConfig {
    /// Set one interval for both the sweep cadence and staleness threshold.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self.stale_after = interval;
        self
    }

    /// Set the breach cool-down.
    pub fn with_breach_cooldown(mut self, cooldown: Duration) -> Self {
        self.breach_cooldown = cooldown;
        self
    }

    /// Set the staleness alert cool-down.
    pub fn with_stale_alert_cooldown(mut self, cooldown: Duration) -> Self {
        self.stale_alert_cooldown = cooldown;
        self
    }

    pub(crate) fn staleness_config(&self) -> StalenessMonitorConfig {
        StalenessMonitorConfig {
            sweep_interval: self.sweep_interval,
            stale_after: self.stale_after,
            alert_cooldown: self.stale_alert_cooldown,
        }
    }

    pub(crate) fn dispatcher_config(&self) -> AlertDispatcherConfig {
        AlertDispatcherConfig {
            queue_depth: self.alert_queue_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.breach_cooldown, Duration::from_secs(60));
        assert_eq!(config.sweep_interval, Duration::from_secs(60));
        assert_eq!(config.stale_after, Duration::from_secs(60));
        assert_eq!(config.stale_alert_cooldown, Duration::from_secs(60));
        assert_eq!(config.broadcast_capacity, DEFAULT_BROADCAST_CAPACITY);
    }

    #[test]
    fn test_sweep_interval_governs_threshold() {
        let config = TrackerConfig::default().with_sweep_interval(Duration::from_secs(30));
        assert_eq!(config.sweep_interval, Duration::from_secs(30));
        assert_eq!(config.stale_after, Duration::from_secs(30));
    }
}
