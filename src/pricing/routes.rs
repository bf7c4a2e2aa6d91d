//! Pricing route handlers

use axum::{extract::State, routing::post, Json, Router};
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::pricing::requests::{
    CompareRequest, EstimateRequest, LocationDto, QuoteRequest, ValidateRequest,
};
use crate::pricing::responses::{CompareResponse, EstimateResponse, QuoteResponse};
use crate::pricing::services::{FareParams, PriceCheck};
use crate::distance::resolver::{DistanceResult, DistanceStatus};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(quote))
        .route("/estimate", post(estimate))
        .route("/compare", post(compare))
        .route("/validate", post(validate))
}

/// Distance figures for a trip: taken from the request when supplied,
/// resolved from the endpoints otherwise. A resolver error leaves the
/// distance unknown so the quote comes back flagged as estimated.
async fn trip_distance(
    state: &AppState,
    origin: Option<LocationDto>,
    destination: Option<LocationDto>,
    waypoints: &[String],
    distance_km: Option<f64>,
    duration_min: Option<f64>,
) -> (Option<f64>, Option<f64>, Option<DistanceResult>) {
    if distance_km.is_some() {
        return (distance_km, duration_min, None);
    }

    let inputs = (
        origin.and_then(LocationDto::into_input),
        destination.and_then(LocationDto::into_input),
    );
    let (Some(from), Some(to)) = inputs else {
        return (None, duration_min, None);
    };

    let resolved = state.resolver.resolve(&from, &to, waypoints).await;
    match resolved.status {
        DistanceStatus::Error => {
            debug!("distance unresolvable, quoting as estimate only");
            (None, None, Some(resolved))
        }
        _ => (
            Some(resolved.distance_km),
            Some(resolved.duration_min),
            Some(resolved),
        ),
    }
}

/// Full quote for one vehicle class
pub async fn quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let pickup_text = req.origin.as_ref().map(LocationDto::text).unwrap_or_default();
    let destination_text = req
        .destination
        .as_ref()
        .map(LocationDto::text)
        .unwrap_or_default();

    let (distance_km, duration_min, distance) = trip_distance(
        &state,
        req.origin,
        req.destination,
        &req.waypoints,
        req.distance_km,
        req.duration_min,
    )
    .await;

    let params = FareParams {
        vehicle_type: req.vehicle_type,
        distance_km,
        duration_min,
        pickup_at: req.pickup_at,
        pickup_text,
        destination_text,
        has_stopover: req.has_stopover,
        is_return: req.is_return,
        overrides: req.pricing_override,
    };

    let breakdown = state.pricing.calculate(&params)?;
    Ok(Json(QuoteResponse {
        quote_id: Uuid::new_v4(),
        breakdown,
        distance,
    }))
}

/// Quick estimate before an address is known
pub async fn estimate(
    State(state): State<AppState>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>> {
    let breakdown =
        state
            .pricing
            .estimate_price(&req.vehicle_type, req.estimated_km, req.pickup_at)?;
    Ok(Json(EstimateResponse {
        quote_id: Uuid::new_v4(),
        breakdown,
    }))
}

/// Price every vehicle class for the same trip, cheapest first
pub async fn compare(
    State(state): State<AppState>,
    Json(req): Json<CompareRequest>,
) -> Result<Json<CompareResponse>> {
    let pickup_text = req.origin.as_ref().map(LocationDto::text).unwrap_or_default();
    let destination_text = req
        .destination
        .as_ref()
        .map(LocationDto::text)
        .unwrap_or_default();

    let (distance_km, duration_min, distance) = trip_distance(
        &state,
        req.origin,
        req.destination,
        &req.waypoints,
        req.distance_km,
        req.duration_min,
    )
    .await;

    let params = FareParams {
        vehicle_type: String::new(),
        distance_km,
        duration_min,
        pickup_at: req.pickup_at,
        pickup_text,
        destination_text,
        has_stopover: req.has_stopover,
        is_return: req.is_return,
        overrides: None,
    };

    let options = state.pricing.compare_prices(&params);
    Ok(Json(CompareResponse { options, distance }))
}

/// Sanity-check a previously computed breakdown
pub async fn validate(
    State(state): State<AppState>,
    Json(req): Json<ValidateRequest>,
) -> Result<Json<PriceCheck>> {
    Ok(Json(state.pricing.validate_price(&req.breakdown)))
}
