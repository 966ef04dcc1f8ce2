//! Herd rule engine (pure computations over a herd snapshot).
//!
//! - Feed ration calculation per milking shift
//! - Reproductive and calf-care alerts
//! - Calendar forecast of calving, dry-off, checks and breeding dates
//! - Alert resolutions and birth recording as record patches
//! - Production and finance summaries
//! - Feeding-day rollover
//! - Ledger and stock bookkeeping for treatments, purchases and sales
//!
//! Nothing here performs I/O or reads the clock: `today` is always passed in.

#![warn(missing_docs)]

pub mod warning;
pub mod ration;
pub mod alerts;
pub mod forecast;
pub mod shift;
pub mod resolution;
pub mod report;
pub mod day;
pub mod bookkeeping;

mod days;

pub use warning::RecordWarning;
pub use ration::{compute_ration, ration_sheet, Ration, MIN_DAILY_TARGET_KG};
pub use alerts::{compute_alerts, Alert, AlertAction, AlertEngine, AlertReport, Severity};
pub use forecast::{forecast_events, EventKind, Forecast, ForecastEvent, Forecaster};
pub use shift::{bucket_to_liters, detect_shift};
pub use resolution::{
    record_birth, resolve, BirthOutcome, BirthRecord, Resolution, ResolutionError,
};
pub use report::{
    animal_summary, cash_balance, daily_yield, period_summary, reference_price, AnimalSummary,
    CashBalance, PeriodSummary,
};
pub use day::{as_of, start_day};
pub use bookkeeping::{
    health_expense, purchase_entry, receive_stock, sale_entry, use_stock, BookkeepingError,
    StockPurchase,
};
