//! Core fare calculation.
//!
//! Pure functions, no I/O: distance resolution happens elsewhere and the
//! result is passed in. All arithmetic runs on unrounded `Decimal` values;
//! every output field is rounded independently at the point of
//! construction, so rounded components may differ from the rounded
//! subtotal by a cent.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::pricing::models::{RoundingPolicy, Settings, VehiclePricing};
use crate::pricing::rules::{SurchargeContext, SurchargeRule};

/// Minutes covered by the base fare before time charging starts.
const FREE_MINUTES: Decimal = dec!(15);

/// Stopover surcharge rate and its floor.
const STOPOVER_RATE: Decimal = dec!(0.10);
const STOPOVER_MINIMUM: Decimal = dec!(2.50);

/// Return-trip multiplier (10% discount).
const RETURN_FACTOR: Decimal = dec!(0.90);

/// Round a money amount to the given number of decimal places.
pub fn round_money(amount: Decimal, places: u32, policy: RoundingPolicy) -> Decimal {
    amount.round_dp_with_strategy(places, policy.strategy())
}

/// Resolved inputs for one fare computation. Vehicle-class lookup and
/// override merging happen in the service layer; this struct carries the
/// effective numbers only.
#[derive(Debug, Clone)]
pub struct FareInput<'a> {
    pub distance_km: Option<f64>,
    pub duration_min: Option<f64>,
    pub pickup_at: DateTime<Utc>,
    pub pickup_text: &'a str,
    pub destination_text: &'a str,
    pub has_stopover: bool,
    pub is_return: bool,
}

/// One applied surcharge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurchargeLine {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub kind: String,
}

/// The computed price breakdown. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBreakdown {
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub distance_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub time_price: Decimal,
    #[serde(default)]
    pub surcharges: Vec<SurchargeLine>,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub tax: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub minimum: Decimal,
    pub currency: String,
    /// True when no real measured distance was supplied; the price is
    /// subject to change once the route is known.
    pub estimated_only: bool,
}

/// Compute a price breakdown.
///
/// Never fails on malformed numerics: missing or non-positive distance and
/// duration are treated as zero and the result is flagged
/// `estimated_only`.
pub fn calculate_fare(
    pricing: &VehiclePricing,
    settings: &Settings,
    rules: &[SurchargeRule],
    input: &FareInput<'_>,
) -> PriceBreakdown {
    let distance = sanitize(input.distance_km);
    let duration = sanitize(input.duration_min);

    let base_price = pricing.base;
    let distance_price = distance * pricing.per_km;

    // Only minutes beyond the free allowance are charged; the base fare
    // already covers a typical short ride's time.
    let billable_minutes = (duration - FREE_MINUTES).max(Decimal::ZERO);
    let time_price = billable_minutes * pricing.per_minute;

    let pickup_local = input
        .pickup_at
        .with_timezone(&settings.timezone)
        .naive_local();
    let context = SurchargeContext {
        pickup_local,
        pickup_text: input.pickup_text,
        destination_text: input.destination_text,
        distance_km: distance,
    };

    // Surcharges scale with base + distance, never with time or with each
    // other.
    let surcharge_base = base_price + distance_price;
    let mut surcharge_total = Decimal::ZERO;
    let mut surcharges = Vec::new();
    for rule in rules {
        if let Some(kind) = rule.applies(&context) {
            let amount = surcharge_base * (rule.factor - Decimal::ONE);
            if amount > Decimal::ZERO {
                surcharge_total += amount;
                surcharges.push((rule, kind, amount));
            }
        }
    }

    let mut subtotal = base_price + distance_price + time_price + surcharge_total;

    // Floor before stopover/return: a short ride with stopovers can exceed
    // the class minimum but never undercut it at this stage.
    subtotal = subtotal.max(pricing.minimum);

    if input.has_stopover {
        subtotal += (subtotal * STOPOVER_RATE).max(STOPOVER_MINIMUM);
    }

    if input.is_return {
        // After the stopover surcharge, so the two adjustments compound.
        subtotal *= RETURN_FACTOR;
    }

    let tax = subtotal * settings.tax_rate;
    let total = subtotal + tax;

    let rounding = settings.rounding;
    let round = |amount: Decimal| round_money(amount, 2, rounding);

    PriceBreakdown {
        base_price: round(base_price),
        distance_price: round(distance_price),
        time_price: round(time_price),
        surcharges: surcharges
            .into_iter()
            .map(|(rule, kind, amount)| SurchargeLine {
                name: rule.name.clone(),
                description: rule.description.clone(),
                amount: round(amount),
                kind: kind.to_string(),
            })
            .collect(),
        subtotal: round(subtotal),
        tax: round(tax),
        total: round(total),
        minimum: round(pricing.minimum),
        currency: settings.currency.clone(),
        estimated_only: input.distance_km.map_or(true, |d| !(d > 0.0)),
    }
}

/// Missing, negative, or non-finite values become zero.
fn sanitize(value: Option<f64>) -> Decimal {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .and_then(Decimal::from_f64)
        .unwrap_or(Decimal::ZERO)
}
