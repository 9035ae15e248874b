//! Keyed alert cool-down.

use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Per-key cool-down map: at most one acquisition per key per window.
///
/// Entries are created lazily on first acquisition and refreshed on every
/// subsequent one; they are never removed (bounded by the finite set of
/// active keys). The check-and-record step holds the key's entry lock, so
/// two concurrent evaluations of the same key cannot both acquire.
#[derive(Debug)]
pub struct AlertThrottle<K: Eq + Hash> {
    entries: DashMap<K, Instant>,
    window: Duration,
}

impl<K: Eq + Hash> AlertThrottle<K> {
    /// Create a throttle with the given cool-down window.
    pub fn new(window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            window,
        }
    }

    /// The configured cool-down window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Try to acquire the key at `now`.
    ///
    /// Returns true (and records `now`) when the key has never fired or
    /// strictly more than the window has elapsed since it last fired.
    /// Returns false without touching state otherwise.
    pub fn try_acquire(&self, key: K, now: Instant) -> bool {
        match self.entries.entry(key) {
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(now);
                true
            }
            dashmap::mapref::entry::Entry::Occupied(mut slot) => {
                let last = *slot.get();
                if now.saturating_duration_since(last) > self.window {
                    slot.insert(now);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// When the key last fired, if ever.
    pub fn last_fired(&self, key: &K) -> Option<Instant> {
        self.entries.get(key).map(|e| *e)
    }

    /// Number of keys that have ever fired.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no key has ever fired.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_acquisition_allowed() {
        let throttle = AlertThrottle::new(Duration::from_secs(60));
        let now = Instant::now();
        assert!(throttle.try_acquire("pp-1".to_string(), now));
        assert_eq!(throttle.last_fired(&"pp-1".to_string()), Some(now));
    }

    #[test]
    fn test_within_window_suppressed() {
        let throttle = AlertThrottle::new(Duration::from_secs(60));
        let t0 = Instant::now();
        assert!(throttle.try_acquire("k".to_string(), t0));

        // 59s later: still inside the window
        assert!(!throttle.try_acquire("k".to_string(), t0 + Duration::from_secs(59)));
        // Exactly at the window boundary: strict comparison, still suppressed
        assert!(!throttle.try_acquire("k".to_string(), t0 + Duration::from_secs(60)));
        // Suppression does not refresh the timestamp
        assert_eq!(throttle.last_fired(&"k".to_string()), Some(t0));
    }

    #[test]
    fn test_beyond_window_reacquires() {
        let throttle = AlertThrottle::new(Duration::from_secs(60));
        let t0 = Instant::now();
        assert!(throttle.try_acquire("k".to_string(), t0));

        let t1 = t0 + Duration::from_secs(61);
        assert!(throttle.try_acquire("k".to_string(), t1));
        assert_eq!(throttle.last_fired(&"k".to_string()), Some(t1));
    }

    #[test]
    fn test_keys_are_independent() {
        let throttle = AlertThrottle::new(Duration::from_secs(60));
        let now = Instant::now();

        assert!(throttle.try_acquire(("pp-1".to_string(), "pso-1".to_string()), now));
        assert!(throttle.try_acquire(("pp-1".to_string(), "pso-2".to_string()), now));
        assert!(!throttle.try_acquire(("pp-1".to_string(), "pso-1".to_string()), now));
        assert_eq!(throttle.len(), 2);
    }

    #[test]
    fn test_out_of_order_now_is_suppressed() {
        // A `now` earlier than the recorded firing saturates to zero
        // elapsed and stays inside the window rather than underflowing.
        let throttle = AlertThrottle::new(Duration::from_secs(60));
        let t1 = Instant::now() + Duration::from_secs(120);
        assert!(throttle.try_acquire("k".to_string(), t1));
        assert!(!throttle.try_acquire("k".to_string(), t1 - Duration::from_secs(30)));
    }
}
