//! Distance resolution.
//!
//! Async, I/O-bound counterpart to the pricing math: a routing provider
//! lookup with a great-circle fallback and a TTL memo of results.

pub mod cache;
pub mod haversine;
pub mod provider;
pub mod resolver;
pub mod routes;

// Re-export commonly used items
pub use cache::{Clock, DistanceCache, ManualClock, SystemClock};
pub use provider::{Coordinates, LocationInput, MapsClient, MapsConfig, ProviderError, RouteProvider};
pub use resolver::{DistanceResolver, DistanceResult, DistanceStatus};
