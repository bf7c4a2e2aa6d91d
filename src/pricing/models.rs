//! Pricing configuration: per-class rates, field-level overrides, and
//! global settings.

use std::collections::BTreeMap;

use chrono_tz::Tz;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Per vehicle-class rates. Source of truth is the static table in
/// [`VehicleTable::builtin`]; individual fields can be overridden per
/// calculation (admin-configured pricing).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VehiclePricing {
    #[serde(with = "rust_decimal::serde::str")]
    pub base: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub per_km: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub per_minute: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub minimum: Decimal,
}

impl VehiclePricing {
    /// Apply field-level overrides; unset fields keep the table value.
    pub fn with_override(&self, overrides: &PricingOverride) -> VehiclePricing {
        VehiclePricing {
            base: overrides.base.unwrap_or(self.base),
            per_km: overrides.per_km.unwrap_or(self.per_km),
            per_minute: overrides.per_minute.unwrap_or(self.per_minute),
            minimum: overrides.minimum.unwrap_or(self.minimum),
        }
    }
}

/// Field-level pricing override, every field optional.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PricingOverride {
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub base: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub per_km: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub per_minute: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub minimum: Option<Decimal>,
}

/// Vehicle-class pricing table, keyed by class identifier.
///
/// BTreeMap so iteration (and therefore comparison output on equal totals)
/// is deterministic.
#[derive(Debug, Clone)]
pub struct VehicleTable {
    classes: BTreeMap<String, VehiclePricing>,
}

impl VehicleTable {
    /// The built-in EUR rate card.
    pub fn builtin() -> Self {
        let mut classes = BTreeMap::new();
        classes.insert(
            "standard".to_string(),
            VehiclePricing {
                base: dec!(35),
                per_km: dec!(2.00),
                per_minute: dec!(0.50),
                minimum: dec!(40),
            },
        );
        classes.insert(
            "executive".to_string(),
            VehiclePricing {
                base: dec!(45),
                per_km: dec!(2.50),
                per_minute: dec!(0.60),
                minimum: dec!(55),
            },
        );
        classes.insert(
            "van".to_string(),
            VehiclePricing {
                base: dec!(50),
                per_km: dec!(2.75),
                per_minute: dec!(0.65),
                minimum: dec!(60),
            },
        );
        classes.insert(
            "minibus".to_string(),
            VehiclePricing {
                base: dec!(65),
                per_km: dec!(3.20),
                per_minute: dec!(0.80),
                minimum: dec!(80),
            },
        );
        Self { classes }
    }

    pub fn get(&self, vehicle_type: &str) -> Option<&VehiclePricing> {
        self.classes.get(vehicle_type)
    }

    /// Replace or add a class rate.
    pub fn insert(&mut self, vehicle_type: String, pricing: VehiclePricing) {
        self.classes.insert(vehicle_type, pricing);
    }

    pub fn classes(&self) -> impl Iterator<Item = (&String, &VehiclePricing)> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Rounding applied to every money figure at the point of output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingPolicy {
    /// Commercial rounding, halves away from zero. The default.
    HalfUp,
    /// Banker's rounding, halves to even.
    HalfEven,
}

impl RoundingPolicy {
    pub fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingPolicy::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingPolicy::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

/// Global pricing settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub tax_rate: Decimal,
    pub currency: String,
    pub rounding: RoundingPolicy,
    /// Surcharge rules are evaluated against the pickup instant in this
    /// timezone, not in UTC.
    pub timezone: Tz,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tax_rate: dec!(0.06),
            currency: "EUR".to_string(),
            rounding: RoundingPolicy::HalfUp,
            timezone: chrono_tz::Europe::Brussels,
        }
    }
}
