//! Alert resolutions and birth recording.
//!
//! Turns what the farmer did about an alert into a partial record update.
//! The store applies the patch; nothing here writes.

use chrono::NaiveDate;
use dairyman_core::{Animal, AnimalId, AnimalPatch, AnimalStatus, Pregnancy, Sex};
use tracing::info;

use crate::alerts::AlertAction;

/// Lot newborn calves are placed in.
pub const NURSERY_LOT: &str = "nursery";

/// Errors raised when a resolution does not fit the animal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// The animal's status does not allow this resolution
    #[error("animal {animal} is {status}, cannot {action}")]
    NotApplicable {
        /// Animal concerned
        animal: AnimalId,
        /// Its status
        status: AnimalStatus,
        /// Attempted action
        action: &'static str,
    },

    /// Weaning needs to know whether the calf becomes a heifer or a steer
    #[error("animal {0} has no recorded sex")]
    UnknownSex(AnimalId),

    /// Calf and dam share an ear tag
    #[error("calf tag {0} is the mother's tag")]
    SameTag(AnimalId),
}

/// What was done about an alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Cow was inseminated today
    Inseminated,
    /// Pregnancy check positive
    Pregnant,
    /// Pregnancy check negative; the insemination is discarded
    Empty,
    /// Cow dried off
    DriedOff,
    /// Calf received colostrum
    ColostrumGiven,
    /// Calf weaned, optionally moved to a lot
    Weaned {
        /// Destination lot
        lot: Option<String>,
    },
}

impl Resolution {
    /// The alert action this resolution answers.
    pub fn action(&self) -> AlertAction {
        match self {
            Resolution::Inseminated => AlertAction::Inseminate,
            Resolution::Pregnant | Resolution::Empty => AlertAction::Diagnose,
            Resolution::DriedOff => AlertAction::DryOff,
            Resolution::ColostrumGiven => AlertAction::GiveColostrum,
            Resolution::Weaned { .. } => AlertAction::Wean,
        }
    }

    fn applies_to(&self, status: AnimalStatus) -> bool {
        match self {
            Resolution::Inseminated | Resolution::Pregnant | Resolution::Empty => status.is_cow(),
            Resolution::DriedOff => status == AnimalStatus::Lactating,
            Resolution::ColostrumGiven | Resolution::Weaned { .. } => status == AnimalStatus::Calf,
        }
    }
}

/// Build the update for `animal` after `resolution` was carried out on `today`.
pub fn resolve(
    animal: &Animal,
    resolution: &Resolution,
    today: NaiveDate,
) -> Result<AnimalPatch, ResolutionError> {
    if !resolution.applies_to(animal.status) {
        return Err(ResolutionError::NotApplicable {
            animal: animal.id.clone(),
            status: animal.status,
            action: resolution.action().as_str(),
        });
    }

    let patch = match resolution {
        Resolution::Inseminated => AnimalPatch {
            insemination_date: Some(Some(today)),
            pregnancy: Some(Pregnancy::Unknown),
            ..Default::default()
        },
        Resolution::Pregnant => AnimalPatch {
            pregnancy: Some(Pregnancy::Confirmed),
            ..Default::default()
        },
        Resolution::Empty => AnimalPatch {
            pregnancy: Some(Pregnancy::Open),
            insemination_date: Some(None),
            ..Default::default()
        },
        Resolution::DriedOff => AnimalPatch {
            status: Some(AnimalStatus::Dry),
            feedings_per_day: Some(0),
            ..Default::default()
        },
        Resolution::ColostrumGiven => AnimalPatch {
            colostrum_given: Some(true),
            ..Default::default()
        },
        Resolution::Weaned { lot } => {
            let status = match animal.sex {
                Some(Sex::Female) => AnimalStatus::Heifer,
                Some(Sex::Male) => AnimalStatus::Steer,
                None => return Err(ResolutionError::UnknownSex(animal.id.clone())),
            };
            AnimalPatch {
                status: Some(status),
                lot: lot.clone().map(Some),
                ..Default::default()
            }
        }
    };

    info!(animal = %animal.id, action = resolution.action().as_str(), "alert resolved");
    Ok(patch)
}

/// A calving as entered by the farmer.
#[derive(Debug, Clone, PartialEq)]
pub struct BirthRecord {
    /// Ear tag for the calf
    pub calf_id: AnimalId,
    /// Calf name
    pub calf_name: String,
    /// Calf sex
    pub sex: Sex,
    /// Day of birth
    pub date: NaiveDate,
    /// Milkings per day for the fresh cow
    pub feedings_per_day: u32,
}

/// Records produced by a calving.
#[derive(Debug, Clone, PartialEq)]
pub struct BirthOutcome {
    /// Update for the dam
    pub mother_patch: AnimalPatch,
    /// New calf record
    pub calf: Animal,
}

/// Record a calving: the dam starts a new lactation, the calf joins the nursery.
pub fn record_birth(mother: &Animal, birth: &BirthRecord) -> Result<BirthOutcome, ResolutionError> {
    if mother.status == AnimalStatus::Calf {
        return Err(ResolutionError::NotApplicable {
            animal: mother.id.clone(),
            status: mother.status,
            action: "calve",
        });
    }
    if birth.calf_id == mother.id {
        return Err(ResolutionError::SameTag(birth.calf_id.clone()));
    }

    let mother_patch = AnimalPatch {
        status: Some(AnimalStatus::Lactating),
        feedings_per_day: Some(birth.feedings_per_day),
        calving_date: Some(Some(birth.date)),
        pregnancy: Some(Pregnancy::Open),
        insemination_date: Some(None),
        ..Default::default()
    };

    let mut calf = Animal::new(birth.calf_id.clone(), birth.calf_name.clone(), AnimalStatus::Calf)
        .with_birth(birth.date)
        .with_sex(birth.sex)
        .with_colostrum(false);
    calf.lot = Some(NURSERY_LOT.to_string());
    calf.mother_id = Some(mother.id.clone());

    info!(mother = %mother.id, calf = %calf.id, date = %birth.date, "birth recorded");
    Ok(BirthOutcome { mother_patch, calf })
}
