//! Animal model - one head of cattle and its reproductive state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::date::DateField;
use crate::id::AnimalId;

/// An animal of the herd as kept by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    /// Ear tag
    pub id: AnimalId,

    /// Display name
    pub name: String,

    /// Current category; decides which rules apply
    pub status: AnimalStatus,

    /// Sex, when recorded
    #[serde(default)]
    pub sex: Option<Sex>,

    /// Management group (pasture lot, nursery, ...)
    #[serde(default)]
    pub lot: Option<String>,

    /// Liters milked yesterday
    #[serde(default)]
    pub milk_yield_yesterday: f64,

    /// Concentrate fed so far today, in kg
    #[serde(default)]
    pub feed_given_today: f64,

    /// Day `feed_given_today` belongs to; `None` before the first feeding
    #[serde(default)]
    pub feed_day: Option<NaiveDate>,

    /// Scheduled feedings per day; 0 means no active schedule
    #[serde(default)]
    pub feedings_per_day: u32,

    /// Last insemination
    #[serde(default)]
    pub insemination_date: DateField,

    /// Last calving
    #[serde(default)]
    pub calving_date: DateField,

    /// Pregnancy diagnosis
    #[serde(default)]
    pub pregnancy: Pregnancy,

    /// Birth date (calves)
    #[serde(default)]
    pub birth_date: DateField,

    /// Whether the calf received colostrum
    #[serde(default)]
    pub colostrum_given: bool,

    /// Dam, when born on the farm
    #[serde(default)]
    pub mother_id: Option<AnimalId>,
}

impl Animal {
    /// Create an animal with no production or reproductive history.
    pub fn new(id: impl Into<AnimalId>, name: impl Into<String>, status: AnimalStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            sex: None,
            lot: None,
            milk_yield_yesterday: 0.0,
            feed_given_today: 0.0,
            feed_day: None,
            feedings_per_day: 0,
            insemination_date: DateField::Missing,
            calving_date: DateField::Missing,
            pregnancy: Pregnancy::Unknown,
            birth_date: DateField::Missing,
            colostrum_given: false,
            mother_id: None,
        }
    }

    /// Set yesterday's yield and the feeding schedule.
    pub fn with_production(mut self, liters: f64, feedings_per_day: u32) -> Self {
        self.milk_yield_yesterday = liters;
        self.feedings_per_day = feedings_per_day;
        self
    }

    /// Set the feed already given today.
    pub fn with_feed_given(mut self, kg: f64) -> Self {
        self.feed_given_today = kg;
        self
    }

    /// Set the insemination date.
    pub fn with_insemination(mut self, date: impl Into<DateField>) -> Self {
        self.insemination_date = date.into();
        self
    }

    /// Set the calving date.
    pub fn with_calving(mut self, date: impl Into<DateField>) -> Self {
        self.calving_date = date.into();
        self
    }

    /// Set the birth date.
    pub fn with_birth(mut self, date: impl Into<DateField>) -> Self {
        self.birth_date = date.into();
        self
    }

    /// Set the pregnancy diagnosis.
    pub fn with_pregnancy(mut self, pregnancy: Pregnancy) -> Self {
        self.pregnancy = pregnancy;
        self
    }

    /// Set the sex.
    pub fn with_sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    /// Mark colostrum as given (or not).
    pub fn with_colostrum(mut self, given: bool) -> Self {
        self.colostrum_given = given;
        self
    }

    /// Apply a partial update in place.
    pub fn apply(&mut self, patch: &AnimalPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(lot) = &patch.lot {
            self.lot = lot.clone();
        }
        if let Some(liters) = patch.milk_yield_yesterday {
            self.milk_yield_yesterday = liters;
        }
        if let Some(kg) = patch.feed_given_today {
            self.feed_given_today = kg;
        }
        if let Some(day) = patch.feed_day {
            self.feed_day = Some(day);
        }
        if let Some(n) = patch.feedings_per_day {
            self.feedings_per_day = n;
        }
        if let Some(date) = patch.insemination_date {
            self.insemination_date = date.into();
        }
        if let Some(date) = patch.calving_date {
            self.calving_date = date.into();
        }
        if let Some(pregnancy) = patch.pregnancy {
            self.pregnancy = pregnancy;
        }
        if let Some(given) = patch.colostrum_given {
            self.colostrum_given = given;
        }
    }
}

/// Animal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimalStatus {
    /// Cow being milked
    Lactating,
    /// Cow resting before the next calving
    Dry,
    /// Unweaned calf
    Calf,
    /// Weaned female
    Heifer,
    /// Weaned male
    Steer,
    /// Breeding male
    Bull,
}

impl AnimalStatus {
    /// Every status, in display order.
    pub const ALL: [AnimalStatus; 6] = [
        AnimalStatus::Lactating,
        AnimalStatus::Dry,
        AnimalStatus::Calf,
        AnimalStatus::Heifer,
        AnimalStatus::Steer,
        AnimalStatus::Bull,
    ];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimalStatus::Lactating => "lactating",
            AnimalStatus::Dry => "dry",
            AnimalStatus::Calf => "calf",
            AnimalStatus::Heifer => "heifer",
            AnimalStatus::Steer => "steer",
            AnimalStatus::Bull => "bull",
        }
    }

    /// Whether the animal is an adult cow in the breeding cycle.
    pub fn is_cow(&self) -> bool {
        matches!(self, AnimalStatus::Lactating | AnimalStatus::Dry)
    }
}

impl std::fmt::Display for AnimalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AnimalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnimalStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown animal status: {s}"))
    }
}

/// Pregnancy diagnosis.
///
/// Persisted as a nullable boolean: `null` is [`Pregnancy::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<bool>", into = "Option<bool>")]
pub enum Pregnancy {
    /// Not diagnosed
    #[default]
    Unknown,
    /// Diagnosed pregnant
    Confirmed,
    /// Diagnosed empty
    Open,
}

impl Pregnancy {
    /// Whether the animal is known to be pregnant.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Pregnancy::Confirmed)
    }
}

impl From<Option<bool>> for Pregnancy {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Pregnancy::Unknown,
            Some(true) => Pregnancy::Confirmed,
            Some(false) => Pregnancy::Open,
        }
    }
}

impl From<Pregnancy> for Option<bool> {
    fn from(value: Pregnancy) -> Self {
        match value {
            Pregnancy::Unknown => None,
            Pregnancy::Confirmed => Some(true),
            Pregnancy::Open => Some(false),
        }
    }
}

/// Sex of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    /// Female
    Female,
    /// Male
    Male,
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "female" | "f" => Ok(Sex::Female),
            "male" | "m" => Ok(Sex::Male),
            _ => Err(format!("unknown sex: {s}")),
        }
    }
}

/// Partial update of an animal record.
///
/// `None` leaves a field untouched. Date fields use `Some(None)` to clear
/// the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimalPatch {
    /// New name
    pub name: Option<String>,
    /// New status
    pub status: Option<AnimalStatus>,
    /// New lot (`Some(None)` clears it)
    pub lot: Option<Option<String>>,
    /// New yield for yesterday
    pub milk_yield_yesterday: Option<f64>,
    /// New feed total for today
    pub feed_given_today: Option<f64>,
    /// Day the feed total belongs to
    pub feed_day: Option<NaiveDate>,
    /// New feeding schedule
    pub feedings_per_day: Option<u32>,
    /// New insemination date
    pub insemination_date: Option<Option<NaiveDate>>,
    /// New calving date
    pub calving_date: Option<Option<NaiveDate>>,
    /// New pregnancy diagnosis
    pub pregnancy: Option<Pregnancy>,
    /// New colostrum flag
    pub colostrum_given: Option<bool>,
}

impl AnimalPatch {
    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == AnimalPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_pregnancy_roundtrips_as_nullable_bool() {
        let json =
            serde_json::to_string(&[Pregnancy::Unknown, Pregnancy::Confirmed, Pregnancy::Open])
                .unwrap();
        assert_eq!(json, "[null,true,false]");
        let back: Vec<Pregnancy> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vec![Pregnancy::Unknown, Pregnancy::Confirmed, Pregnancy::Open]);
    }

    #[test]
    fn test_minimal_record_uses_defaults() {
        let animal: Animal = serde_json::from_str(
            r#"{"id": "105", "name": "Mimosa", "status": "lactating", "insemination_date": "not a date"}"#,
        )
        .unwrap();
        assert_eq!(animal.id, AnimalId::new("105"));
        assert_eq!(animal.pregnancy, Pregnancy::Unknown);
        assert_eq!(animal.feedings_per_day, 0);
        assert!(animal.birth_date.is_missing());
        assert!(animal.insemination_date.resolve().is_err());
    }

    #[test]
    fn test_apply_patch_clears_and_sets() {
        let mut animal = Animal::new("202", "Estrela", AnimalStatus::Lactating)
            .with_insemination(date(2024, 1, 10))
            .with_production(18.0, 2);

        animal.apply(&AnimalPatch {
            pregnancy: Some(Pregnancy::Open),
            insemination_date: Some(None),
            ..Default::default()
        });

        assert_eq!(animal.pregnancy, Pregnancy::Open);
        assert!(animal.insemination_date.is_missing());
        assert_eq!(animal.feedings_per_day, 2);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Heifer".parse::<AnimalStatus>().unwrap(), AnimalStatus::Heifer);
        assert!("cow".parse::<AnimalStatus>().is_err());
        assert!(AnimalPatch::default().is_empty());
    }
}
