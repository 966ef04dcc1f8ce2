//! Health records - treatments given to one animal or the whole herd.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::id::{AnimalId, HealthId};

/// A treatment, with what it cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Unique identifier
    pub id: HealthId,

    /// Day of the treatment
    pub date: NaiveDate,

    /// Kind of treatment
    pub kind: HealthKind,

    /// Product used
    #[serde(default)]
    pub product: String,

    /// Treated animal; `None` means the whole herd
    #[serde(default)]
    pub animal_id: Option<AnimalId>,

    /// Total cost
    #[serde(default)]
    pub cost: f64,

    /// Free text
    #[serde(default)]
    pub notes: String,
}

impl HealthRecord {
    /// Create a herd-wide record.
    pub fn new(date: NaiveDate, kind: HealthKind, product: impl Into<String>, cost: f64) -> Self {
        Self {
            id: HealthId::new(),
            date,
            kind,
            product: product.into(),
            animal_id: None,
            cost,
            notes: String::new(),
        }
    }

    /// Restrict the record to one animal.
    pub fn for_animal(mut self, animal_id: AnimalId) -> Self {
        self.animal_id = Some(animal_id);
        self
    }

    /// Attach notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Whether the whole herd was treated.
    pub fn is_herd_wide(&self) -> bool {
        self.animal_id.is_none()
    }
}

/// Kind of treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthKind {
    /// Vaccination
    Vaccine,
    /// Deworming
    Dewormer,
    /// Antibiotic course
    Antibiotic,
    /// Hormonal treatment
    Hormone,
    /// Hoof trimming
    HoofTrimming,
    /// Anything else
    Other,
}

impl HealthKind {
    /// Every kind.
    pub const ALL: [HealthKind; 6] = [
        HealthKind::Vaccine,
        HealthKind::Dewormer,
        HealthKind::Antibiotic,
        HealthKind::Hormone,
        HealthKind::HoofTrimming,
        HealthKind::Other,
    ];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthKind::Vaccine => "vaccine",
            HealthKind::Dewormer => "dewormer",
            HealthKind::Antibiotic => "antibiotic",
            HealthKind::Hormone => "hormone",
            HealthKind::HoofTrimming => "hoof_trimming",
            HealthKind::Other => "other",
        }
    }
}

impl std::fmt::Display for HealthKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HealthKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HealthKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown treatment: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_herd_wide_by_default() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let record = HealthRecord::new(date, HealthKind::Vaccine, "Aftosa", 120.0);
        assert!(record.is_herd_wide());
        assert!(!record.for_animal(AnimalId::new("105")).is_herd_wide());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("hoof_trimming".parse::<HealthKind>().unwrap(), HealthKind::HoofTrimming);
        assert_eq!("Vaccine".parse::<HealthKind>().unwrap(), HealthKind::Vaccine);
        assert!("surgery".parse::<HealthKind>().is_err());
    }
}
