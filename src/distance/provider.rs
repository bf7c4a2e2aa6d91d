//! HTTP adapter for the routing/geocoding provider.
//!
//! Speaks the distance-matrix and geocode JSON endpoints (driving mode,
//! metric units). All calls carry a request timeout so a hung provider
//! degrades to the geometric fallback instead of blocking resolution.

use serde::{Deserialize, Serialize};

/// Validated WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Rejects out-of-range values rather than clamping them.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
            Some(Self { lat, lng })
        } else {
            None
        }
    }
}

/// A trip endpoint: a free-text address or already-known coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    Address(String),
    Coords(Coordinates),
}

impl LocationInput {
    /// Provider-facing representation, also used in cache keys.
    pub fn as_query(&self) -> String {
        match self {
            LocationInput::Address(addr) => addr.clone(),
            LocationInput::Coords(c) => format!("{:.6},{:.6}", c.lat, c.lng),
        }
    }
}

/// One routed leg as reported by the distance-matrix endpoint.
#[derive(Debug, Clone, Copy)]
pub struct RouteLeg {
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    BadStatus(String),

    #[error("no route element in provider response")]
    MissingElement,

    #[error("no geocoding result for address")]
    NoGeocodeResult,

    #[error("geocoder returned out-of-range coordinates")]
    InvalidCoordinates,
}

/// Routing/geocoding backend seam. Mocked in tests.
#[allow(async_fn_in_trait)]
pub trait RouteProvider: Send + Sync {
    /// Driving distance and duration between two endpoints.
    async fn route(
        &self,
        origin: &LocationInput,
        destination: &LocationInput,
    ) -> Result<RouteLeg, ProviderError>;

    /// Coordinates for a free-text address.
    async fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct MapsConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
            api_key: String::new(),
            timeout_secs: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MapsClient {
    config: MapsConfig,
    client: reqwest::Client,
}

impl MapsClient {
    pub fn new(config: MapsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl RouteProvider for MapsClient {
    async fn route(
        &self,
        origin: &LocationInput,
        destination: &LocationInput,
    ) -> Result<RouteLeg, ProviderError> {
        let url = format!("{}/distancematrix/json", self.config.base_url);
        let response: MatrixResponse = self
            .client
            .get(url)
            .query(&[
                ("origins", origin.as_query()),
                ("destinations", destination.as_query()),
                ("mode", "driving".to_string()),
                ("units", "metric".to_string()),
                ("key", self.config.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "OK" {
            return Err(ProviderError::BadStatus(response.status));
        }

        let element = response
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or(ProviderError::MissingElement)?;

        if element.status != "OK" {
            return Err(ProviderError::BadStatus(element.status));
        }

        match (element.distance, element.duration) {
            (Some(distance), Some(duration)) => Ok(RouteLeg {
                distance_meters: distance.value,
                duration_seconds: duration.value,
            }),
            _ => Err(ProviderError::MissingElement),
        }
    }

    async fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
        let url = format!("{}/geocode/json", self.config.base_url);
        let response: GeocodeResponse = self
            .client
            .get(url)
            .query(&[("address", address), ("key", self.config.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "OK" {
            return Err(ProviderError::BadStatus(response.status));
        }

        let location = response
            .results
            .into_iter()
            .next()
            .map(|r| r.geometry.location)
            .ok_or(ProviderError::NoGeocodeResult)?;

        Coordinates::new(location.lat, location.lng).ok_or(ProviderError::InvalidCoordinates)
    }
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<ValueField>,
    duration: Option<ValueField>,
}

#[derive(Debug, Deserialize)]
struct ValueField {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}
