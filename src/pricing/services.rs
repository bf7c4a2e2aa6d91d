//! Pricing service: vehicle-class resolution, overrides, and the
//! supplementary quote operations on top of the pure calculator.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::pricing::calculators::{calculate_fare, FareInput, PriceBreakdown};
use crate::pricing::models::{PricingOverride, Settings, VehicleTable};
use crate::pricing::rules::SurchargeRule;

/// Default assumed trip length when quoting without an address.
const DEFAULT_ESTIMATE_KM: f64 = 5.0;

/// Assumed minutes of driving per estimated kilometer.
const ESTIMATE_MINUTES_PER_KM: f64 = 2.0;

/// Totals at or above this are considered implausible.
const IMPLAUSIBLE_TOTAL: Decimal = dec!(1000);

/// Totals above this get a verify-the-route warning.
const REVIEW_TOTAL: Decimal = dec!(500);

#[derive(Debug, Clone, thiserror::Error)]
pub enum PricingError {
    #[error("unknown vehicle class '{0}'")]
    InvalidVehicleClass(String),
}

/// Caller-facing calculation parameters.
#[derive(Debug, Clone, Default)]
pub struct FareParams {
    pub vehicle_type: String,
    pub distance_km: Option<f64>,
    pub duration_min: Option<f64>,
    /// Defaults to now.
    pub pickup_at: Option<DateTime<Utc>>,
    pub pickup_text: String,
    pub destination_text: String,
    pub has_stopover: bool,
    pub is_return: bool,
    pub overrides: Option<PricingOverride>,
}

/// One entry of a per-class price comparison.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleQuote {
    pub vehicle_type: String,
    pub breakdown: PriceBreakdown,
}

/// Sanity-check outcome. Advisory only; `valid == false` flags an
/// implausible total, it does not block a booking by itself.
#[derive(Debug, Clone, Serialize)]
pub struct PriceCheck {
    pub valid: bool,
    pub warnings: Vec<String>,
}

/// Owns the pricing configuration and exposes the calculation operations.
pub struct PricingService {
    vehicles: VehicleTable,
    rules: Vec<SurchargeRule>,
    settings: Settings,
}

impl PricingService {
    pub fn new(vehicles: VehicleTable, rules: Vec<SurchargeRule>, settings: Settings) -> Self {
        Self {
            vehicles,
            rules,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Full fare calculation for one vehicle class.
    pub fn calculate(&self, params: &FareParams) -> Result<PriceBreakdown, PricingError> {
        let table_pricing = self
            .vehicles
            .get(&params.vehicle_type)
            .ok_or_else(|| PricingError::InvalidVehicleClass(params.vehicle_type.clone()))?;

        let pricing = match &params.overrides {
            Some(overrides) => table_pricing.with_override(overrides),
            None => *table_pricing,
        };

        let input = FareInput {
            distance_km: params.distance_km,
            duration_min: params.duration_min,
            pickup_at: params.pickup_at.unwrap_or_else(Utc::now),
            pickup_text: &params.pickup_text,
            destination_text: &params.destination_text,
            has_stopover: params.has_stopover,
            is_return: params.is_return,
        };

        Ok(calculate_fare(&pricing, &self.settings, &self.rules, &input))
    }

    /// Quick quote before a real address or distance is known. Assumes
    /// two minutes of driving per kilometer.
    pub fn estimate_price(
        &self,
        vehicle_type: &str,
        estimated_km: Option<f64>,
        pickup_at: Option<DateTime<Utc>>,
    ) -> Result<PriceBreakdown, PricingError> {
        let km = estimated_km.unwrap_or(DEFAULT_ESTIMATE_KM);
        let params = FareParams {
            vehicle_type: vehicle_type.to_string(),
            distance_km: Some(km),
            duration_min: Some(km * ESTIMATE_MINUTES_PER_KM),
            pickup_at,
            ..Default::default()
        };
        self.calculate(&params)
    }

    /// Run the calculation once per known vehicle class, cheapest first.
    pub fn compare_prices(&self, params: &FareParams) -> Vec<VehicleQuote> {
        let mut quotes: Vec<VehicleQuote> = self
            .vehicles
            .classes()
            .filter_map(|(vehicle_type, _)| {
                let per_class = FareParams {
                    vehicle_type: vehicle_type.clone(),
                    ..params.clone()
                };
                self.calculate(&per_class).ok().map(|breakdown| VehicleQuote {
                    vehicle_type: vehicle_type.clone(),
                    breakdown,
                })
            })
            .collect();

        quotes.sort_by(|a, b| a.breakdown.total.cmp(&b.breakdown.total));
        quotes
    }

    /// Sanity-check a computed breakdown.
    pub fn validate_price(&self, breakdown: &PriceBreakdown) -> PriceCheck {
        let mut warnings = Vec::new();

        if breakdown.total > REVIEW_TOTAL {
            warnings.push("total exceeds 500, verify the route before booking".to_string());
        }
        if breakdown.estimated_only {
            warnings.push("estimated price, may change once the route is known".to_string());
        }

        let valid = breakdown.total > Decimal::ZERO && breakdown.total < IMPLAUSIBLE_TOTAL;
        PriceCheck { valid, warnings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::calculators::round_money;
    use crate::pricing::models::RoundingPolicy;
    use crate::pricing::rules::builtin_rules;
    use chrono::TimeZone;

    fn service() -> PricingService {
        PricingService::new(VehicleTable::builtin(), builtin_rules(), Settings::default())
    }

    fn quiet_pickup() -> DateTime<Utc> {
        chrono_tz::Europe::Brussels
            .with_ymd_and_hms(2026, 3, 3, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn params(vehicle_type: &str) -> FareParams {
        FareParams {
            vehicle_type: vehicle_type.to_string(),
            distance_km: Some(10.0),
            duration_min: Some(20.0),
            pickup_at: Some(quiet_pickup()),
            ..Default::default()
        }
    }

    #[test]
    fn test_unknown_vehicle_class_is_an_error() {
        let err = service().calculate(&params("hovercraft")).unwrap_err();
        assert!(matches!(err, PricingError::InvalidVehicleClass(ref c) if c == "hovercraft"));
        assert!(err.to_string().contains("hovercraft"));
    }

    #[test]
    fn test_overrides_change_the_math() {
        let mut p = params("standard");
        p.overrides = Some(PricingOverride {
            per_km: Some(dec!(3.00)),
            ..Default::default()
        });
        let breakdown = service().calculate(&p).unwrap();
        assert_eq!(breakdown.distance_price, dec!(30.00));
        assert_eq!(breakdown.base_price, dec!(35.00));
    }

    #[test]
    fn test_estimate_uses_two_minutes_per_km() {
        let svc = service();
        let estimate = svc
            .estimate_price("standard", Some(20.0), Some(quiet_pickup()))
            .unwrap();
        // 20 km -> 40 min, 25 billable at 0.50 = 12.50
        assert_eq!(estimate.time_price, dec!(12.50));
        assert_eq!(estimate.distance_price, dec!(40.00));
    }

    #[test]
    fn test_estimate_defaults_to_five_km() {
        let estimate = service()
            .estimate_price("standard", None, Some(quiet_pickup()))
            .unwrap();
        assert_eq!(estimate.distance_price, dec!(10.00));
        // 10 minutes assumed, inside the free allowance
        assert_eq!(estimate.time_price, Decimal::ZERO);
    }

    #[test]
    fn test_compare_prices_sorted_ascending() {
        let quotes = service().compare_prices(&params("standard"));
        assert_eq!(quotes.len(), 4);
        for pair in quotes.windows(2) {
            assert!(
                pair[0].breakdown.total <= pair[1].breakdown.total,
                "totals must be ascending: {} then {}",
                pair[0].breakdown.total,
                pair[1].breakdown.total
            );
        }
        assert_eq!(quotes[0].vehicle_type, "standard");
    }

    #[test]
    fn test_validate_flags_large_totals() {
        let svc = service();
        let mut p = params("standard");
        p.distance_km = Some(250.0);
        let breakdown = svc.calculate(&p).unwrap();
        assert!(breakdown.total > dec!(500));
        let check = svc.validate_price(&breakdown);
        assert!(check.valid);
        assert!(check.warnings.iter().any(|w| w.contains("verify the route")));
    }

    #[test]
    fn test_validate_flags_estimated_breakdowns() {
        let svc = service();
        let mut p = params("standard");
        p.distance_km = None;
        let breakdown = svc.calculate(&p).unwrap();
        let check = svc.validate_price(&breakdown);
        assert!(check.valid);
        assert!(check.warnings.iter().any(|w| w.contains("estimated")));
    }

    #[test]
    fn test_validate_rejects_implausible_totals() {
        let svc = service();
        let mut p = params("standard");
        p.distance_km = Some(500.0);
        let breakdown = svc.calculate(&p).unwrap();
        assert!(breakdown.total >= dec!(1000));
        let check = svc.validate_price(&breakdown);
        assert!(!check.valid);
    }

    #[test]
    fn test_minimum_floor_property_across_inputs() {
        // Without stopover or return, the total never undercuts the class
        // minimum (plus tax).
        let svc = service();
        for km in [0.5, 1.0, 2.0, 3.0] {
            for minutes in [0.0, 5.0, 16.0] {
                let mut p = params("standard");
                p.distance_km = Some(km);
                p.duration_min = Some(minutes);
                let breakdown = svc.calculate(&p).unwrap();
                let floor_total = round_money(
                    dec!(40) * (Decimal::ONE + svc.settings().tax_rate),
                    2,
                    RoundingPolicy::HalfUp,
                );
                assert!(
                    breakdown.total >= floor_total,
                    "km={} min={} total={}",
                    km,
                    minutes,
                    breakdown.total
                );
            }
        }
    }
}
