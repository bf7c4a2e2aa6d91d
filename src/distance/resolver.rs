//! Best-effort distance resolution.
//!
//! Tries the routing provider first, degrades to a great-circle estimate,
//! and only reports an error when neither endpoint can be resolved to
//! coordinates. Results are memoized per (origin, destination, waypoints)
//! for the configured TTL; identical requests inside that window never
//! re-trigger a provider call.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::AppCache;
use crate::distance::cache::{Clock, DistanceCache};
use crate::distance::haversine::{estimate_minutes, haversine_km};
use crate::distance::provider::{Coordinates, LocationInput, RouteProvider};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceStatus {
    Success,
    Fallback,
    Error,
}

/// Outcome of a resolution. `status == Error` means "no distance data",
/// not a zero-length trip.
#[derive(Debug, Clone, Serialize)]
pub struct DistanceResult {
    pub distance_km: f64,
    pub duration_min: f64,
    pub status: DistanceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

pub struct DistanceResolver<P: RouteProvider, C: Clock> {
    provider: P,
    cache: DistanceCache<C>,
    geocode_cache: AppCache,
}

impl<P: RouteProvider, C: Clock> DistanceResolver<P, C> {
    pub fn new(provider: P, ttl: Duration, clock: C, geocode_cache: AppCache) -> Self {
        Self {
            provider,
            cache: DistanceCache::new(ttl, clock),
            geocode_cache,
        }
    }

    /// Resolve driving distance and duration between two endpoints.
    ///
    /// Never fails: provider trouble yields a `Fallback` result and total
    /// unresolvability an `Error` result with distance and duration zero.
    pub async fn resolve(
        &self,
        origin: &LocationInput,
        destination: &LocationInput,
        waypoints: &[String],
    ) -> DistanceResult {
        let key = cache_key(origin, destination, waypoints);

        if let Some(hit) = self.cache.get(&key) {
            debug!("distance cache HIT for {}", key);
            return hit;
        }
        debug!("distance cache MISS for {}", key);

        let result = match self.provider.route(origin, destination).await {
            Ok(leg) => DistanceResult {
                distance_km: round_km(leg.distance_meters / 1000.0),
                // Ceiling, not nearest: durations must never be under-quoted.
                duration_min: (leg.duration_seconds / 60.0).ceil(),
                status: DistanceStatus::Success,
                error_message: None,
            },
            Err(err) => {
                warn!("routing lookup failed ({}), using geometric fallback", err);
                self.geometric_fallback(origin, destination).await
            }
        };

        self.cache.put(key, result.clone());
        result
    }

    /// Straight-line estimate from geocoded endpoints.
    async fn geometric_fallback(
        &self,
        origin: &LocationInput,
        destination: &LocationInput,
    ) -> DistanceResult {
        let from = self.coordinates_for(origin).await;
        let to = self.coordinates_for(destination).await;

        match (from, to) {
            (Some(from), Some(to)) => {
                let distance_km = round_km(haversine_km(from, to));
                DistanceResult {
                    distance_km,
                    duration_min: estimate_minutes(distance_km),
                    status: DistanceStatus::Fallback,
                    error_message: None,
                }
            }
            _ => DistanceResult {
                distance_km: 0.0,
                duration_min: 0.0,
                status: DistanceStatus::Error,
                error_message: Some(
                    "could not resolve origin or destination to coordinates".to_string(),
                ),
            },
        }
    }

    async fn coordinates_for(&self, location: &LocationInput) -> Option<Coordinates> {
        match location {
            LocationInput::Coords(coords) => Some(*coords),
            LocationInput::Address(address) => {
                if let Some(cached) = self.geocode_cache.geocodes.get(address) {
                    debug!("geocode cache HIT for {}", address);
                    return Some(cached);
                }
                match self.provider.geocode(address).await {
                    Ok(coords) => {
                        self.geocode_cache
                            .geocodes
                            .insert(address.clone(), coords);
                        Some(coords)
                    }
                    Err(err) => {
                        warn!("geocoding failed for {}: {}", address, err);
                        None
                    }
                }
            }
        }
    }

    /// Remove expired cache entries. Returns the number removed.
    pub fn sweep(&self) -> usize {
        self.cache.sweep()
    }

    /// Stored cache entries, expired ones included.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }
}

fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

fn cache_key(origin: &LocationInput, destination: &LocationInput, waypoints: &[String]) -> String {
    let mut parts = vec![origin.as_query(), destination.as_query()];
    parts.extend(waypoints.iter().cloned());
    parts.join("|")
}
