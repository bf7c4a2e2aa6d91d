//! NaviCab pricing engine.
//!
//! Two collaborating cores: async best-effort distance resolution
//! (`distance`) and pure fare calculation (`pricing`), exposed to the
//! booking frontend over HTTP/JSON.

pub mod cache;
pub mod config;
pub mod distance;
pub mod error;
pub mod pricing;

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::cache::{AppCache, CacheStats};
use crate::distance::cache::SystemClock;
use crate::distance::provider::MapsClient;
use crate::distance::resolver::DistanceResolver;
use crate::pricing::services::PricingService;

// Re-export the calculation entry points for in-process callers
pub use pricing::calculators::{calculate_fare, round_money, PriceBreakdown};
pub use pricing::services::{FareParams, PricingError};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<DistanceResolver<MapsClient, SystemClock>>,
    pub pricing: Arc<PricingService>,
    pub cache: AppCache,
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .nest("/api/pricing", pricing::routes::router())
        .nest("/api/distance", distance::routes::router())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    cache: CacheStats,
    distance_entries: usize,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: state.cache.stats(),
        distance_entries: state.resolver.cached_entries(),
    })
}
