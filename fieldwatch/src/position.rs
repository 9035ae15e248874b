//! In-memory position store.
//!
//! Holds the last known coordinate and report time for every tracked
//! entity. One entry per entity, overwritten on every update; no history
//! is retained and entries are never removed.
//!
//! # Thread Safety
//!
//! Backed by a [`DashMap`] keyed by entity id. Entries are independent
//! (no cross-entity invariants), so per-key shard locking is sufficient;
//! concurrent updates for different entities never contend.

use std::time::Instant;

use dashmap::DashMap;

use crate::geo::Coordinate;

/// Last known position of a tracked entity.
#[derive(Debug, Clone, Copy)]
pub struct TrackedPosition {
    /// Last reported coordinate.
    pub coordinate: Coordinate,
    /// When the coordinate was recorded.
    pub observed_at: Instant,
}

/// Process-wide store of last known positions.
///
/// Writes are last-write-wins: an out-of-order update simply overwrites
/// the previous entry. Coordinate ranges are not validated; producers own
/// input quality and downstream distance math degrades NaN to non-breach.
#[derive(Debug, Default)]
pub struct PositionStore {
    entries: DashMap<String, TrackedPosition>,
}

impl PositionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Record a position report, unconditionally overwriting any previous
    /// entry for the entity.
    pub fn record(&self, entity_id: &str, coordinate: Coordinate, now: Instant) {
        self.entries.insert(
            entity_id.to_string(),
            TrackedPosition {
                coordinate,
                observed_at: now,
            },
        );
    }

    /// Last known coordinate, or `None` if the entity has never reported.
    pub fn coordinate(&self, entity_id: &str) -> Option<Coordinate> {
        self.entries.get(entity_id).map(|e| e.coordinate)
    }

    /// When the entity last reported, or `None` if it never has.
    pub fn last_seen_at(&self, entity_id: &str) -> Option<Instant> {
        self.entries.get(entity_id).map(|e| e.observed_at)
    }

    /// Snapshot of all tracked entity ids.
    ///
    /// Used by the staleness sweep. The snapshot is taken shard by shard;
    /// entities recorded mid-iteration may or may not appear, which is
    /// fine for a periodic sweep.
    pub fn tracked_entities(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    /// Number of tracked entities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entity has ever reported.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_empty_store() {
        let store = PositionStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.coordinate("pp-1").is_none());
        assert!(store.last_seen_at("pp-1").is_none());
    }

    #[test]
    fn test_record_and_read_back() {
        let store = PositionStore::new();
        let now = Instant::now();
        store.record("pp-1", Coordinate::new(40.0, -74.0), now);

        assert_eq!(store.len(), 1);
        assert_eq!(store.coordinate("pp-1"), Some(Coordinate::new(40.0, -74.0)));
        assert_eq!(store.last_seen_at("pp-1"), Some(now));
    }

    #[test]
    fn test_overwrite_is_last_write_wins() {
        let store = PositionStore::new();
        let earlier = Instant::now();
        let later = earlier + Duration::from_secs(10);

        store.record("pso-7", Coordinate::new(40.0, -74.0), later);
        // Out-of-order update still overwrites
        store.record("pso-7", Coordinate::new(41.0, -75.0), earlier);

        assert_eq!(store.coordinate("pso-7"), Some(Coordinate::new(41.0, -75.0)));
        assert_eq!(store.last_seen_at("pso-7"), Some(earlier));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unvalidated_coordinates_are_stored() {
        let store = PositionStore::new();
        store.record("bad", Coordinate::new(f64::NAN, 500.0), Instant::now());
        let c = store.coordinate("bad").unwrap();
        assert!(c.latitude.is_nan());
        assert_eq!(c.longitude, 500.0);
    }

    #[test]
    fn test_tracked_entities_snapshot() {
        let store = PositionStore::new();
        let now = Instant::now();
        store.record("a", Coordinate::new(0.0, 0.0), now);
        store.record("b", Coordinate::new(1.0, 1.0), now);

        let mut ids = store.tracked_entities();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }
}
