//! Day rollover of the feeding counters.
//!
//! `feed_given_today` only grows within a day. It goes back to zero once,
//! the first time a cow is touched on a new day, and yesterday's milkings
//! become her `milk_yield_yesterday`.

use chrono::NaiveDate;
use dairyman_core::{Animal, AnimalPatch, AnimalStatus, MilkingRecord};
use tracing::debug;

use crate::days::offset;
use crate::report::daily_yield;

/// Update opening `today` for `animal`, or `None` when her counters already
/// belong to `today` or she is not in milk.
///
/// A cow not milked yesterday gets a yield of zero.
pub fn start_day(
    animal: &Animal,
    milkings: &[MilkingRecord],
    today: NaiveDate,
) -> Option<AnimalPatch> {
    if animal.status != AnimalStatus::Lactating || animal.feed_day == Some(today) {
        return None;
    }

    let yesterday = offset(today, -1)?;
    let liters = daily_yield(milkings, &animal.id, yesterday).unwrap_or(0.0);
    debug!(animal = %animal.id, %today, liters, "feeding day opened");

    Some(AnimalPatch {
        feed_given_today: Some(0.0),
        feed_day: Some(today),
        milk_yield_yesterday: Some(liters),
        ..Default::default()
    })
}

/// `animal` as it stands on `today`, rolled over in memory if needed.
pub fn as_of(animal: &Animal, milkings: &[MilkingRecord], today: NaiveDate) -> Animal {
    let mut current = animal.clone();
    if let Some(patch) = start_day(animal, milkings, today) {
        current.apply(&patch);
    }
    current
}
