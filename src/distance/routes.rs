//! Distance route handlers

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::pricing::requests::LocationDto;
use crate::distance::resolver::DistanceResult;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/resolve", post(resolve))
        .route("/sweep", post(sweep))
}

/// Request to resolve a trip's distance and duration
#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub origin: LocationDto,
    pub destination: LocationDto,
    #[serde(default)]
    pub waypoints: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub removed: usize,
    pub remaining: usize,
}

/// Resolve driving distance between two endpoints.
///
/// Resolver trouble is reported inside the result (`status`), not as an
/// HTTP error; only a request with no usable endpoint at all is rejected.
pub async fn resolve(
    State(state): State<AppState>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<DistanceResult>> {
    let origin = req
        .origin
        .into_input()
        .ok_or_else(|| AppError::BadRequest("origin has no address or coordinates".to_string()))?;
    let destination = req.destination.into_input().ok_or_else(|| {
        AppError::BadRequest("destination has no address or coordinates".to_string())
    })?;

    let result = state.resolver.resolve(&origin, &destination, &req.waypoints).await;
    Ok(Json(result))
}

/// Evict expired distance cache entries
pub async fn sweep(State(state): State<AppState>) -> Json<SweepResponse> {
    let removed = state.resolver.sweep();
    Json(SweepResponse {
        removed,
        remaining: state.resolver.cached_entries(),
    })
}
