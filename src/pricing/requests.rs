//! Request DTOs for pricing API endpoints.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::distance::provider::{Coordinates, LocationInput};
use crate::pricing::calculators::PriceBreakdown;
use crate::pricing::models::PricingOverride;

/// A trip endpoint: free text, coordinates, or both.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationDto {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl LocationDto {
    /// Coordinates win over the address. Out-of-range coordinates are
    /// treated as absent, never clamped.
    pub fn into_input(self) -> Option<LocationInput> {
        if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            if let Some(coords) = Coordinates::new(lat, lng) {
                return Some(LocationInput::Coords(coords));
            }
        }
        self.address
            .filter(|a| !a.trim().is_empty())
            .map(LocationInput::Address)
    }

    /// The free-text form, used for keyword surcharge matching.
    pub fn text(&self) -> String {
        self.address.clone().unwrap_or_default()
    }
}

/// Request for a full quote. Distance is resolved from the endpoints when
/// not supplied directly.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub vehicle_type: String,
    #[serde(default)]
    pub origin: Option<LocationDto>,
    #[serde(default)]
    pub destination: Option<LocationDto>,
    #[serde(default)]
    pub waypoints: Vec<String>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub duration_min: Option<f64>,
    #[serde(default)]
    pub pickup_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub has_stopover: bool,
    #[serde(default)]
    pub is_return: bool,
    #[serde(default)]
    pub pricing_override: Option<PricingOverride>,
}

/// Request for a quick estimate before an address is known.
#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub vehicle_type: String,
    #[serde(default)]
    pub estimated_km: Option<f64>,
    #[serde(default)]
    pub pickup_at: Option<DateTime<Utc>>,
}

/// Request for a per-class price comparison.
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub origin: Option<LocationDto>,
    #[serde(default)]
    pub destination: Option<LocationDto>,
    #[serde(default)]
    pub waypoints: Vec<String>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub duration_min: Option<f64>,
    #[serde(default)]
    pub pickup_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub has_stopover: bool,
    #[serde(default)]
    pub is_return: bool,
}

/// Request to sanity-check a previously computed breakdown.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub breakdown: PriceBreakdown,
}
