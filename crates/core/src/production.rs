//! Milking records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::id::{AnimalId, MilkingId};

/// One milking of one cow, with the concentrate fed in the parlour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilkingRecord {
    /// Unique identifier
    pub id: MilkingId,

    /// Day of the milking
    pub date: NaiveDate,

    /// Shift within the day (1-based)
    pub shift: u8,

    /// Cow milked
    pub animal_id: AnimalId,

    /// Milk obtained, in liters
    pub liters: f64,

    /// Feed dispensed, in kg
    pub feed_kg: f64,
}

impl MilkingRecord {
    /// Create a new milking record.
    pub fn new(date: NaiveDate, shift: u8, animal_id: AnimalId, liters: f64, feed_kg: f64) -> Self {
        Self {
            id: MilkingId::new(),
            date,
            shift,
            animal_id,
            liters,
            feed_kg,
        }
    }
}
