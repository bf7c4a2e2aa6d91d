//! In-memory caching using moka
//!
//! Holds geocoding results (address -> coordinates). Addresses move rarely,
//! so a long TTL is used. The distance-result cache lives in
//! `distance::cache` instead because it needs an injectable clock.

use moka::sync::Cache;
use serde::Serialize;
use tracing::info;

use crate::distance::provider::Coordinates;

/// Application cache holding geocoded addresses
#[derive(Clone)]
pub struct AppCache {
    /// Geocoding results (address -> coordinates)
    pub geocodes: Cache<String, Coordinates>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Geocodes: 10k entries, 6 hour TTL, 1 hour idle
            geocodes: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(std::time::Duration::from_secs(6 * 60 * 60))
                .time_to_idle(std::time::Duration::from_secs(60 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            geocodes_size: self.geocodes.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.geocodes.invalidate_all();
        info!("All caches invalidated");
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub geocodes_size: u64,
}
