//! TTL cache for resolved distances.
//!
//! Deliberately not moka: the resolver needs an injectable cache with an
//! injectable clock so tests can drive time, and expired entries must read
//! as misses without being evicted until an explicit sweep.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::distance::resolver::DistanceResult;

/// Source of the current instant. Injected so tests control expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Settable clock for deterministic tests.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().expect("clock lock poisoned")
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

struct Entry {
    result: DistanceResult,
    inserted_at: Instant,
}

/// Mutex-guarded map of cache key to resolved distance.
///
/// Reads treat entries past the TTL as misses; stale entries stay in the
/// map until [`DistanceCache::sweep`] runs or a fresh result overwrites
/// them, so memory grows between sweeps.
pub struct DistanceCache<C: Clock> {
    entries: Mutex<HashMap<String, Entry>>,
    ttl: Duration,
    clock: C,
}

impl<C: Clock> DistanceCache<C> {
    pub fn new(ttl: Duration, clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Live entry for the key, if any. Expired entries are not returned
    /// and not removed.
    pub fn get(&self, key: &str) -> Option<DistanceResult> {
        let entries = self.entries.lock().expect("cache lock poisoned");
        let entry = entries.get(key)?;
        if self.clock.now().duration_since(entry.inserted_at) < self.ttl {
            Some(entry.result.clone())
        } else {
            None
        }
    }

    /// Insert or overwrite, stamped with the current instant.
    pub fn put(&self, key: String, result: DistanceResult) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(
            key,
            Entry {
                result,
                inserted_at: self.clock.now(),
            },
        );
    }

    /// Remove every expired entry. Returns the number removed.
    pub fn sweep(&self) -> usize {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let now = self.clock.now();
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.inserted_at) < self.ttl);
        let removed = before - entries.len();
        if removed > 0 {
            debug!("distance cache sweep removed {} expired entries", removed);
        }
        removed
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::resolver::DistanceStatus;

    fn result(km: f64) -> DistanceResult {
        DistanceResult {
            distance_km: km,
            duration_min: 10.0,
            status: DistanceStatus::Success,
            error_message: None,
        }
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = DistanceCache::new(Duration::from_secs(60), ManualClock::new());
        cache.put("a|b".to_string(), result(5.0));
        let hit = cache.get("a|b").expect("should hit");
        assert_eq!(hit.distance_km, 5.0);
    }

    #[test]
    fn test_expired_entry_is_a_miss_but_not_removed() {
        let clock = ManualClock::new();
        let cache = DistanceCache::new(Duration::from_secs(60), clock);
        cache.put("a|b".to_string(), result(5.0));
        cache.clock.advance(Duration::from_secs(61));
        assert!(cache.get("a|b").is_none(), "expired entry should miss");
        assert_eq!(cache.len(), 1, "expired entry stays until sweep");
    }

    #[test]
    fn test_sweep_removes_only_expired() {
        let clock = ManualClock::new();
        let cache = DistanceCache::new(Duration::from_secs(60), clock);
        cache.put("old".to_string(), result(1.0));
        cache.clock.advance(Duration::from_secs(45));
        cache.put("fresh".to_string(), result(2.0));
        cache.clock.advance(Duration::from_secs(30));

        let removed = cache.sweep();
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("fresh").is_some());
    }

    #[test]
    fn test_overwrite_refreshes_timestamp() {
        let clock = ManualClock::new();
        let cache = DistanceCache::new(Duration::from_secs(60), clock);
        cache.put("k".to_string(), result(1.0));
        cache.clock.advance(Duration::from_secs(59));
        cache.put("k".to_string(), result(2.0));
        cache.clock.advance(Duration::from_secs(30));
        let hit = cache.get("k").expect("refreshed entry should still be live");
        assert_eq!(hit.distance_km, 2.0);
    }
}
