//! Fare calculation engine.
//!
//! Pure pricing math over a resolved distance/duration figure plus booking
//! context. Called by the booking frontend via HTTP/JSON; the calculation
//! itself performs no I/O.

pub mod calculators;
pub mod holidays;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod rules;
pub mod services;

// Re-export commonly used items
pub use calculators::{calculate_fare, round_money, PriceBreakdown, SurchargeLine};
pub use models::{PricingOverride, RoundingPolicy, Settings, VehiclePricing, VehicleTable};
pub use routes::router;
pub use rules::{builtin_rules, Applicability, SurchargeRule};
pub use services::{FareParams, PriceCheck, PricingError, PricingService, VehicleQuote};
