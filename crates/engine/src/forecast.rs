//! Calendar forecast of reproductive events.

use chrono::NaiveDate;
use dairyman_core::{Animal, AnimalId, ForecastHorizon, HerdSnapshot, ReproductionThresholds};
use serde::Serialize;
use tracing::info;

use crate::alerts::Severity;
use crate::days::offset;
use crate::warning::{pregnant_without_insemination, read_date, RecordWarning};

/// Kind of projected event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Expected calving
    ExpectedCalving,
    /// Date to stop milking
    DryOff,
    /// Pregnancy check due
    PregnancyCheck,
    /// Waiting period over, cow can be bred
    BreedingEligible,
}

impl EventKind {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::ExpectedCalving => "expected_calving",
            EventKind::DryOff => "dry_off",
            EventKind::PregnancyCheck => "pregnancy_check",
            EventKind::BreedingEligible => "breeding_eligible",
        }
    }

    /// Default severity of the event on the calendar.
    pub fn severity(&self) -> Severity {
        match self {
            EventKind::ExpectedCalving | EventKind::PregnancyCheck => Severity::Info,
            EventKind::DryOff => Severity::Warning,
            EventKind::BreedingEligible => Severity::Critical,
        }
    }
}

/// A projected calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastEvent {
    /// Projected date
    pub date: NaiveDate,
    /// What happens
    pub kind: EventKind,
    /// Animal concerned
    pub animal_id: AnimalId,
    /// Its display name
    pub animal_name: String,
    /// Calendar severity
    pub severity: Severity,
}

/// Projected events plus the records that could not be projected.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Forecast {
    /// Unordered events
    pub events: Vec<ForecastEvent>,
    /// Per-record problems
    pub warnings: Vec<RecordWarning>,
}

impl Forecast {
    /// Events dated within `[today, today + days]`, sorted by date then animal.
    pub fn upcoming(&self, today: NaiveDate, days: u32) -> Vec<&ForecastEvent> {
        let until = offset(today, i64::from(days)).unwrap_or(NaiveDate::MAX);
        let mut events: Vec<_> = self
            .events
            .iter()
            .filter(|e| e.date >= today && e.date <= until)
            .collect();
        events.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.animal_id.cmp(&b.animal_id))
                .then_with(|| a.kind.cmp(&b.kind))
        });
        events
    }

    /// Events falling on one day.
    pub fn on(&self, date: NaiveDate) -> impl Iterator<Item = &ForecastEvent> {
        self.events.iter().filter(move |e| e.date == date)
    }
}

/// Event projector.
#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    thresholds: ReproductionThresholds,
    horizon: ForecastHorizon,
}

impl Forecaster {
    /// Create a forecaster.
    pub fn new(thresholds: ReproductionThresholds, horizon: ForecastHorizon) -> Self {
        Self { thresholds, horizon }
    }

    /// Project events for every animal of the herd.
    pub fn project(&self, herd: &HerdSnapshot, today: NaiveDate) -> Forecast {
        let mut forecast = Forecast::default();
        for animal in herd {
            self.project_animal(animal, today, &mut forecast);
        }
        info!(
            animals = herd.len(),
            events = forecast.events.len(),
            warnings = forecast.warnings.len(),
            "forecast projected"
        );
        forecast
    }

    fn project_animal(&self, animal: &Animal, today: NaiveDate, out: &mut Forecast) {
        let t = &self.thresholds;
        let Ok(insemination) =
            read_date(animal, "insemination_date", &animal.insemination_date, &mut out.warnings)
        else {
            return;
        };

        if animal.pregnancy.is_confirmed() {
            let Some(inseminated) = insemination else {
                pregnant_without_insemination(animal, &mut out.warnings);
                return;
            };
            // Not windowed: the calendar decides what to show
            if let Some(calving) = offset(inseminated, i64::from(t.gestation_days)) {
                push(out, animal, calving, EventKind::ExpectedCalving);
                if let Some(dry_off) = offset(calving, -i64::from(t.dry_off_window_days)) {
                    push(out, animal, dry_off, EventKind::DryOff);
                }
            }
            return;
        }

        if let Some(inseminated) = insemination {
            let due = offset(inseminated, i64::from(t.diagnosis_window_days));
            let stale = offset(today, -i64::from(self.horizon.diagnosis_lookback_days));
            if let (Some(due), Some(stale)) = (due, stale) {
                if due >= stale {
                    push(out, animal, due, EventKind::PregnancyCheck);
                }
            }
            return;
        }

        let Ok(Some(calved)) =
            read_date(animal, "calving_date", &animal.calving_date, &mut out.warnings)
        else {
            return;
        };
        let eligible = offset(calved, i64::from(t.voluntary_waiting_period_days));
        let stale = offset(today, -i64::from(self.horizon.breeding_lookback_days));
        if let (Some(eligible), Some(stale)) = (eligible, stale) {
            if eligible >= stale {
                push(out, animal, eligible, EventKind::BreedingEligible);
            }
        }
    }
}

fn push(out: &mut Forecast, animal: &Animal, date: NaiveDate, kind: EventKind) {
    out.events.push(ForecastEvent {
        date,
        kind,
        animal_id: animal.id.clone(),
        animal_name: animal.name.clone(),
        severity: kind.severity(),
    });
}

/// Project events for the herd with the given windows.
pub fn forecast_events(
    herd: &HerdSnapshot,
    today: NaiveDate,
    thresholds: &ReproductionThresholds,
    horizon: &ForecastHorizon,
) -> Forecast {
    Forecaster::new(thresholds.clone(), horizon.clone()).project(herd, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dairyman_core::{AnimalStatus, DateField, Pregnancy};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn ago(days: i64) -> NaiveDate {
        today() - chrono::Duration::days(days)
    }

    fn cow(id: &str) -> Animal {
        Animal::new(id, format!("Cow {id}"), AnimalStatus::Lactating)
    }

    fn run(animals: Vec<Animal>) -> Forecast {
        forecast_events(
            &HerdSnapshot::new(animals),
            today(),
            &ReproductionThresholds::default(),
            &ForecastHorizon::default(),
        )
    }

    fn kinds(forecast: &Forecast) -> Vec<(&str, EventKind, NaiveDate)> {
        forecast
            .events
            .iter()
            .map(|e| (e.animal_id.as_str(), e.kind, e.date))
            .collect()
    }

    #[test]
    fn test_pregnant_cow_projects_calving_and_dry_off() {
        let inseminated = ago(400);
        let forecast = run(vec![cow("1")
            .with_insemination(inseminated)
            .with_pregnancy(Pregnancy::Confirmed)]);
        let calving = inseminated + chrono::Duration::days(283);
        assert_eq!(
            kinds(&forecast),
            vec![
                ("1", EventKind::ExpectedCalving, calving),
                ("1", EventKind::DryOff, calving - chrono::Duration::days(60)),
            ]
        );
        // Both in the past, still projected
        assert!(forecast.events.iter().all(|e| e.date < today()));
    }

    #[test]
    fn test_pregnancy_check_lookback() {
        let forecast = run(vec![
            cow("1").with_insemination(ago(35)),
            cow("2").with_insemination(ago(36)),
            cow("3").with_insemination(ago(3)).with_pregnancy(Pregnancy::Open),
        ]);
        assert_eq!(
            kinds(&forecast),
            vec![
                ("1", EventKind::PregnancyCheck, ago(5)),
                ("3", EventKind::PregnancyCheck, ago(3) + chrono::Duration::days(30)),
            ]
        );
    }

    #[test]
    fn test_breeding_eligibility_lookback() {
        let forecast = run(vec![
            cow("1").with_calving(ago(75)),
            cow("2").with_calving(ago(76)),
            cow("3").with_calving(ago(10)),
        ]);
        assert_eq!(
            kinds(&forecast),
            vec![
                ("1", EventKind::BreedingEligible, ago(30)),
                ("3", EventKind::BreedingEligible, ago(10) + chrono::Duration::days(45)),
            ]
        );
        assert_eq!(forecast.events[0].severity, Severity::Critical);
    }

    #[test]
    fn test_malformed_and_inconsistent_records() {
        let mut broken = cow("1").with_calving(ago(10));
        broken.insemination_date = DateField::Malformed("??".to_string());
        let mut broken_calving = cow("2");
        broken_calving.calving_date = DateField::Malformed("2025-13-40".to_string());
        let forecast = run(vec![
            broken,
            broken_calving,
            cow("3").with_pregnancy(Pregnancy::Confirmed),
            cow("4").with_calving(ago(10)),
        ]);

        assert_eq!(kinds(&forecast).len(), 1);
        assert_eq!(forecast.events[0].animal_id.as_str(), "4");
        assert_eq!(forecast.warnings.len(), 3);
        assert!(matches!(forecast.warnings[2], RecordWarning::InconsistentState { .. }));
    }

    #[test]
    fn test_upcoming_window_sorted() {
        let forecast = run(vec![
            cow("b").with_calving(ago(40)),
            cow("a").with_calving(ago(40)),
            cow("c").with_insemination(ago(20)),
            cow("d").with_calving(ago(0)),
        ]);
        let upcoming = forecast.upcoming(today(), 30);
        let ids: Vec<_> = upcoming.iter().map(|e| e.animal_id.as_str()).collect();
        // a/b on day +5, c on day +10; d falls on day +45
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(forecast.on(ago(40) + chrono::Duration::days(45)).count(), 2);
    }

    #[test]
    fn test_idempotent() {
        let herd = HerdSnapshot::new(vec![
            cow("1").with_insemination(ago(100)).with_pregnancy(Pregnancy::Confirmed),
            cow("2").with_calving(ago(20)),
        ]);
        let t = ReproductionThresholds::default();
        let h = ForecastHorizon::default();
        assert_eq!(
            forecast_events(&herd, today(), &t, &h),
            forecast_events(&herd, today(), &t, &h)
        );
    }
}
