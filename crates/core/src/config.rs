//! Farm configuration - tunable constants with documented defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading or validating the farm configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A value outside its valid range
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// All farm-specific constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    /// Concentrate allocation
    pub ration: RationConfig,

    /// Reproductive and growth windows
    pub reproduction: ReproductionThresholds,

    /// Calendar projection windows
    pub forecast: ForecastHorizon,

    /// Prices used by the reports
    pub finance: FinanceConfig,

    /// Milk density (kg per liter) used to convert bucket weights
    pub milk_density: f64,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            ration: RationConfig::default(),
            reproduction: ReproductionThresholds::default(),
            forecast: ForecastHorizon::default(),
            finance: FinanceConfig::default(),
            milk_density: 1.032,
        }
    }
}

impl FarmConfig {
    /// Parse and validate a JSON document. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: FarmConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Check every value is usable by the engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("ration.conversion_factor", self.ration.conversion_factor)?;
        positive("ration.max_per_feeding_kg", self.ration.max_per_feeding_kg)?;
        non_negative("ration.pasture_baseline_liters", self.ration.pasture_baseline_liters)?;
        positive("milk_density", self.milk_density)?;
        non_negative("finance.default_milk_price", self.finance.default_milk_price)?;
        non_negative("finance.feed_price_per_kg", self.finance.feed_price_per_kg)?;

        let r = &self.reproduction;
        if r.dry_off_window_days >= r.gestation_days {
            return Err(ConfigError::Invalid {
                field: "reproduction.dry_off_window_days",
                reason: format!(
                    "{} must be shorter than gestation ({})",
                    r.dry_off_window_days, r.gestation_days
                ),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("{value} must be > 0") })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: format!("{value} must be >= 0") })
    }
}

/// Concentrate allocation constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RationConfig {
    /// Liters a cow produces from pasture alone
    pub pasture_baseline_liters: f64,

    /// Liters of milk per kg of concentrate
    pub conversion_factor: f64,

    /// Hard ceiling for a single feeding, in kg
    pub max_per_feeding_kg: f64,
}

impl Default for RationConfig {
    fn default() -> Self {
        Self {
            pasture_baseline_liters: 4.0,
            conversion_factor: 3.0,
            max_per_feeding_kg: 6.0,
        }
    }
}

/// Reproductive-cycle and growth windows, in days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReproductionThresholds {
    /// Insemination to calving
    pub gestation_days: u32,

    /// Insemination to pregnancy check
    pub diagnosis_window_days: u32,

    /// Calving to first insemination
    pub voluntary_waiting_period_days: u32,

    /// Dry-off lead time before the expected calving
    pub dry_off_window_days: u32,

    /// Age at which calves are weaned
    pub weaning_age_days: u32,

    /// Age up to which a calf must have received colostrum
    pub colostrum_window_days: u32,
}

impl Default for ReproductionThresholds {
    fn default() -> Self {
        Self {
            gestation_days: 283,
            diagnosis_window_days: 30,
            voluntary_waiting_period_days: 45,
            dry_off_window_days: 60,
            weaning_age_days: 90,
            colostrum_window_days: 2,
        }
    }
}

/// How far back stale projections are still shown, in days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastHorizon {
    /// Overdue pregnancy checks kept on the calendar
    pub diagnosis_lookback_days: u32,

    /// Overdue breeding eligibility kept on the calendar
    pub breeding_lookback_days: u32,

    /// Length of the "upcoming" agenda
    pub upcoming_days: u32,
}

impl Default for ForecastHorizon {
    fn default() -> Self {
        Self {
            diagnosis_lookback_days: 5,
            breeding_lookback_days: 30,
            upcoming_days: 30,
        }
    }
}

/// Prices used when the ledger has no better figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinanceConfig {
    /// Milk price per liter when no milk payment is linked to the period
    pub default_milk_price: f64,

    /// Estimated cost of concentrate per kg
    pub feed_price_per_kg: f64,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            default_milk_price: 2.50,
            feed_price_per_kg: 2.00,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config = FarmConfig::from_json(r#"{"ration": {"max_per_feeding_kg": 5.0}}"#).unwrap();
        assert_eq!(config.ration.max_per_feeding_kg, 5.0);
        assert_eq!(config.ration.conversion_factor, 3.0);
        assert_eq!(config.reproduction.gestation_days, 283);
        assert_eq!(config.forecast.diagnosis_lookback_days, 5);
    }

    #[test]
    fn test_rejects_zero_conversion_factor() {
        let err = FarmConfig::from_json(r#"{"ration": {"conversion_factor": 0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "ration.conversion_factor", .. }));
    }

    #[test]
    fn test_rejects_dry_off_longer_than_gestation() {
        let mut config = FarmConfig::default();
        config.reproduction.dry_off_window_days = 300;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = FarmConfig::load("/definitely/not/here/farm.json").unwrap();
        assert_eq!(config, FarmConfig::default());
    }
}
