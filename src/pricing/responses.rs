//! Response DTOs for pricing API endpoints.

use serde::Serialize;
use uuid::Uuid;

use crate::distance::resolver::DistanceResult;
use crate::pricing::calculators::PriceBreakdown;
use crate::pricing::services::VehicleQuote;

/// Response for a full quote.
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub quote_id: Uuid,
    pub breakdown: PriceBreakdown,
    /// The distance figure the quote was computed from, when the engine
    /// resolved it itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<DistanceResult>,
}

/// Response for a quick estimate.
#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub quote_id: Uuid,
    pub breakdown: PriceBreakdown,
}

/// Response for a per-class comparison, cheapest first.
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub options: Vec<VehicleQuote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<DistanceResult>,
}
