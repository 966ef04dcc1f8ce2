//! Concentrate ration per milking shift.
//!
//! The daily target follows yesterday's yield above what pasture alone
//! supports. What is left of it is split over the feedings still to come
//! today, and a single feeding never exceeds the configured ceiling.

use dairyman_core::{Animal, AnimalId, AnimalStatus, HerdSnapshot, RationConfig};
use serde::Serialize;
use tracing::debug;

/// Every lactating animal gets at least this much per day, in kg.
pub const MIN_DAILY_TARGET_KG: f64 = 0.5;

/// Suggested feed for the current shift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ration {
    /// Feed to release now, in kg
    pub suggested_kg: f64,

    /// Whether the per-feeding ceiling cut the suggestion
    pub capped: bool,

    /// Feed the animal should get over the whole day, in kg
    pub daily_target_kg: f64,

    /// Target minus what was already fed today, never negative
    pub remaining_budget_kg: f64,

    /// Feedings left today, including this one
    pub remaining_opportunities: u32,
}

/// Compute the ration for `animal` at the 1-based `shift` of the day.
pub fn compute_ration(animal: &Animal, shift: u32, config: &RationConfig) -> Ration {
    let daily_target_kg = ((animal.milk_yield_yesterday - config.pasture_baseline_liters)
        / config.conversion_factor)
        .max(MIN_DAILY_TARGET_KG);

    // An extra shift outside the schedule still counts as one opportunity
    let passed = i64::from(shift.max(1)) - 1;
    let remaining_opportunities = (i64::from(animal.feedings_per_day) - passed).max(1) as u32;

    let remaining_budget_kg = (daily_target_kg - animal.feed_given_today).max(0.0);
    let mut suggested_kg = remaining_budget_kg / f64::from(remaining_opportunities);

    let capped = suggested_kg > config.max_per_feeding_kg;
    if capped {
        suggested_kg = config.max_per_feeding_kg;
    }

    debug!(
        animal = %animal.id,
        shift,
        daily_target_kg,
        remaining_budget_kg,
        remaining_opportunities,
        suggested_kg,
        capped,
        "ration computed"
    );

    Ration {
        suggested_kg,
        capped,
        daily_target_kg,
        remaining_budget_kg,
        remaining_opportunities,
    }
}

/// Rations for every lactating animal of the herd, in roster order.
pub fn ration_sheet(
    herd: &HerdSnapshot,
    shift: u32,
    config: &RationConfig,
) -> Vec<(AnimalId, Ration)> {
    herd.with_status(AnimalStatus::Lactating)
        .map(|animal| (animal.id.clone(), compute_ration(animal, shift, config)))
        .collect()
}
