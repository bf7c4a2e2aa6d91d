//! Environment-driven configuration.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};
use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::distance::provider::MapsConfig;
use crate::pricing::models::{RoundingPolicy, Settings, VehiclePricing, VehicleTable};

/// Default distance cache TTL: 30 minutes.
const DEFAULT_DISTANCE_TTL_SECS: u64 = 30 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub maps: MapsConfig,
    pub distance_ttl: Duration,
    pub settings: Settings,
    /// Optional JSON file replacing or extending the built-in rate card.
    pub vehicle_table_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env_or("NAVICAB_BIND", "0.0.0.0:8080")
            .parse()
            .context("parsing NAVICAB_BIND")?;

        let maps_defaults = MapsConfig::default();
        let maps = MapsConfig {
            base_url: env_or("MAPS_BASE_URL", &maps_defaults.base_url),
            api_key: std::env::var("MAPS_API_KEY").unwrap_or_default(),
            timeout_secs: env_or("MAPS_TIMEOUT_SECS", &maps_defaults.timeout_secs.to_string())
                .parse()
                .context("parsing MAPS_TIMEOUT_SECS")?,
        };

        let distance_ttl = Duration::from_secs(
            env_or(
                "DISTANCE_CACHE_TTL_SECS",
                &DEFAULT_DISTANCE_TTL_SECS.to_string(),
            )
            .parse()
            .context("parsing DISTANCE_CACHE_TTL_SECS")?,
        );

        let defaults = Settings::default();
        let settings = Settings {
            tax_rate: Decimal::from_str(&env_or("TAX_RATE", &defaults.tax_rate.to_string()))
                .context("parsing TAX_RATE")?,
            currency: env_or("CURRENCY", &defaults.currency),
            rounding: match std::env::var("ROUNDING_POLICY") {
                Ok(raw) => parse_rounding(&raw)?,
                Err(_) => defaults.rounding,
            },
            timezone: match std::env::var("PRICING_TIMEZONE") {
                Ok(raw) => Tz::from_str(&raw)
                    .map_err(|e| anyhow::anyhow!("invalid PRICING_TIMEZONE: {}", e))?,
                Err(_) => defaults.timezone,
            },
        };

        let vehicle_table_path = std::env::var("VEHICLE_TABLE_PATH").ok().map(PathBuf::from);

        Ok(Self {
            bind_addr,
            maps,
            distance_ttl,
            settings,
            vehicle_table_path,
        })
    }

    /// The built-in rate card, merged with the JSON file when configured.
    pub fn load_vehicle_table(&self) -> anyhow::Result<VehicleTable> {
        let mut table = VehicleTable::builtin();
        if let Some(path) = &self.vehicle_table_path {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading vehicle table {}", path.display()))?;
            let classes: BTreeMap<String, VehiclePricing> =
                serde_json::from_str(&raw).context("parsing vehicle table JSON")?;
            for (vehicle_type, pricing) in classes {
                table.insert(vehicle_type, pricing);
            }
        }
        Ok(table)
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_rounding(value: &str) -> anyhow::Result<RoundingPolicy> {
    match value {
        "half_up" => Ok(RoundingPolicy::HalfUp),
        "half_even" => Ok(RoundingPolicy::HalfEven),
        other => bail!("unknown ROUNDING_POLICY '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rounding() {
        assert_eq!(parse_rounding("half_up").unwrap(), RoundingPolicy::HalfUp);
        assert_eq!(parse_rounding("half_even").unwrap(), RoundingPolicy::HalfEven);
        assert!(parse_rounding("truncate").is_err());
    }

    #[test]
    fn test_vehicle_table_without_override_file() {
        let config = AppConfig {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            maps: MapsConfig::default(),
            distance_ttl: Duration::from_secs(DEFAULT_DISTANCE_TTL_SECS),
            settings: Settings::default(),
            vehicle_table_path: None,
        };
        let table = config.load_vehicle_table().unwrap();
        assert_eq!(table.len(), 4);
        assert!(table.get("standard").is_some());
    }
}
