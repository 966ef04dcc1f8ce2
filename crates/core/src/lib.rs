//! Dairyman core data models.
//!
//! This crate defines the herd records (animals, milkings, ledger entries,
//! health records, stock) and the farm configuration shared by the engine,
//! the storage backends and the CLI.

#![warn(missing_docs)]

// Identities
mod id;
mod date;

// Herd
mod animal;
mod herd;

// Production & finance
mod production;
mod ledger;
mod health;
mod inventory;

// Configuration
mod config;

// Re-exports
pub use id::*;
pub use date::{DateField, MalformedDate, DATE_FORMAT};

pub use animal::{Animal, AnimalPatch, AnimalStatus, Pregnancy, Sex};
pub use herd::HerdSnapshot;

pub use production::MilkingRecord;
pub use ledger::{Category, EntryKind, LedgerEntry, ReferencePeriod};
pub use health::{HealthKind, HealthRecord};
pub use inventory::StockItem;

pub use config::{
    ConfigError, FarmConfig, FinanceConfig, ForecastHorizon, RationConfig,
    ReproductionThresholds,
};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Calendar date type used by every herd record.
pub type Date = chrono::NaiveDate;
