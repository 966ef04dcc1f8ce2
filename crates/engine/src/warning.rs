//! Per-record warnings.
//!
//! A bad record never aborts a computation over the herd. Instead the rules
//! that depend on the bad value are skipped and a warning is returned next
//! to the results.

use chrono::NaiveDate;
use dairyman_core::{AnimalId, Animal, DateField};
use serde::Serialize;
use tracing::warn;

/// Something wrong with one animal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordWarning {
    /// A stored date could not be read
    #[error("animal {animal}: malformed {field} {raw:?}, dependent rules skipped")]
    MalformedDate {
        /// Animal concerned
        animal: AnimalId,
        /// Field name
        field: &'static str,
        /// Raw stored value
        raw: String,
    },

    /// Contradictory values; nothing can be derived from them
    #[error("animal {animal}: {reason}")]
    InconsistentState {
        /// Animal concerned
        animal: AnimalId,
        /// What contradicts what
        reason: String,
    },
}

impl RecordWarning {
    /// Animal the warning is about.
    pub fn animal(&self) -> &AnimalId {
        match self {
            RecordWarning::MalformedDate { animal, .. } => animal,
            RecordWarning::InconsistentState { animal, .. } => animal,
        }
    }
}

/// Resolve a date field, recording a warning when it is malformed.
///
/// `Err(())` means the field is unusable and dependent rules must be skipped.
pub(crate) fn read_date(
    animal: &Animal,
    field: &'static str,
    value: &DateField,
    warnings: &mut Vec<RecordWarning>,
) -> Result<Option<NaiveDate>, ()> {
    value.resolve().map_err(|e| {
        let warning = RecordWarning::MalformedDate {
            animal: animal.id.clone(),
            field,
            raw: e.raw,
        };
        warn!("{}", warning);
        warnings.push(warning);
    })
}

/// Record a pregnancy confirmed without a breeding date.
pub(crate) fn pregnant_without_insemination(animal: &Animal, warnings: &mut Vec<RecordWarning>) {
    let warning = RecordWarning::InconsistentState {
        animal: animal.id.clone(),
        reason: "pregnancy confirmed but no insemination date recorded".to_string(),
    };
    warn!("{}", warning);
    warnings.push(warning);
}
