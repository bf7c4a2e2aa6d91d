//! Great-circle distance estimation (fallback when the routing provider
//! is unavailable).
//!
//! Straight-line distance ignores the road network, so it undershoots real
//! driving distance; it is only used to keep quoting alive during provider
//! outages.

use crate::distance::provider::Coordinates;

/// Assumed average urban driving speed for duration estimation.
pub const FALLBACK_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates, in kilometers.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Estimated driving minutes for a distance at the fallback speed,
/// rounded up so durations are never under-quoted.
pub fn estimate_minutes(km: f64) -> f64 {
    (km / FALLBACK_SPEED_KMH * 60.0).ceil()
}
