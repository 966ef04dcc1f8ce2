//! Reproductive and calf-care alerts.
//!
//! Every animal is checked against the rules below, in this order:
//!
//! 1. cow inseminated, not diagnosed, diagnosis window elapsed: confirm pregnancy
//! 2. lactating cow not pregnant, not inseminated, waiting period elapsed: inseminate
//! 3. lactating cow pregnant, dry-off date reached: dry off
//! 4. newborn calf without colostrum: give colostrum
//! 5. calf at weaning age: wean
//!
//! Output follows roster order, then rule order.

use chrono::NaiveDate;
use dairyman_core::{
    Animal, AnimalId, AnimalStatus, HerdSnapshot, Pregnancy, ReproductionThresholds,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::days::{days_between, offset};
use crate::warning::{pregnant_without_insemination, read_date, RecordWarning};

/// Alert / event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// For information only
    Info,
    /// Should be handled soon
    Warning,
    /// Needs action now
    Critical,
}

impl Severity {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

/// What the farmer is expected to do about an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertAction {
    /// Run a pregnancy check
    Diagnose,
    /// Breed the cow
    Inseminate,
    /// Stop milking
    DryOff,
    /// Feed colostrum to the newborn
    GiveColostrum,
    /// Wean the calf
    Wean,
}

impl AlertAction {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertAction::Diagnose => "diagnose",
            AlertAction::Inseminate => "inseminate",
            AlertAction::DryOff => "dry_off",
            AlertAction::GiveColostrum => "give_colostrum",
            AlertAction::Wean => "wean",
        }
    }
}

/// An actionable alert about one animal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// Urgency
    pub severity: Severity,
    /// Headline
    pub message: String,
    /// Supporting detail
    pub detail: String,
    /// Expected action
    pub action: AlertAction,
    /// Animal concerned
    pub subject_id: AnimalId,
}

/// Result of evaluating the herd.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertReport {
    /// Alerts in roster order
    pub alerts: Vec<Alert>,
    /// Records that could not be fully evaluated
    pub warnings: Vec<RecordWarning>,
}

impl AlertReport {
    /// Alerts of the given severity.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Alert> {
        self.alerts.iter().filter(move |a| a.severity == severity)
    }

    /// Alerts about one animal.
    pub fn for_animal<'a>(&'a self, id: &'a AnimalId) -> impl Iterator<Item = &'a Alert> {
        self.alerts.iter().filter(move |a| &a.subject_id == id)
    }
}

/// Alert rule engine.
#[derive(Debug, Clone, Default)]
pub struct AlertEngine {
    thresholds: ReproductionThresholds,
}

impl AlertEngine {
    /// Create an engine with the given windows.
    pub fn new(thresholds: ReproductionThresholds) -> Self {
        Self { thresholds }
    }

    /// Evaluate every animal of the herd.
    pub fn evaluate(&self, herd: &HerdSnapshot, today: NaiveDate) -> AlertReport {
        let mut report = AlertReport::default();

        for animal in herd {
            match animal.status {
                AnimalStatus::Lactating | AnimalStatus::Dry => {
                    self.cow_rules(animal, today, &mut report)
                }
                AnimalStatus::Calf => self.calf_rules(animal, today, &mut report),
                AnimalStatus::Heifer | AnimalStatus::Steer | AnimalStatus::Bull => {}
            }
        }

        info!(
            animals = herd.len(),
            alerts = report.alerts.len(),
            warnings = report.warnings.len(),
            %today,
            "herd evaluated"
        );
        report
    }

    fn cow_rules(&self, animal: &Animal, today: NaiveDate, report: &mut AlertReport) {
        let t = &self.thresholds;
        let insemination =
            read_date(animal, "insemination_date", &animal.insemination_date, &mut report.warnings);
        let calving = read_date(animal, "calving_date", &animal.calving_date, &mut report.warnings);
        let lactating = animal.status == AnimalStatus::Lactating;

        if let (Ok(Some(inseminated)), Pregnancy::Unknown) = (insemination, animal.pregnancy) {
            let days = days_between(inseminated, today);
            if days >= i64::from(t.diagnosis_window_days) {
                push(
                    report,
                    animal,
                    Severity::Critical,
                    AlertAction::Diagnose,
                    format!("Confirm pregnancy: {}", animal.name),
                    format!("Inseminated {days} days ago"),
                );
            }
        }

        if lactating && !animal.pregnancy.is_confirmed() {
            if let (Ok(None), Ok(Some(calved))) = (insemination, calving) {
                let days = days_between(calved, today);
                if days > i64::from(t.voluntary_waiting_period_days) {
                    push(
                        report,
                        animal,
                        Severity::Critical,
                        AlertAction::Inseminate,
                        format!("Ready to inseminate: {}", animal.name),
                        format!("Open for {days} days since calving"),
                    );
                }
            }
        }

        if lactating && animal.pregnancy.is_confirmed() {
            match insemination {
                Ok(Some(inseminated)) => {
                    let expected_calving = offset(inseminated, i64::from(t.gestation_days));
                    let dry_off = expected_calving
                        .and_then(|d| offset(d, -i64::from(t.dry_off_window_days)));
                    if let (Some(expected_calving), Some(dry_off)) = (expected_calving, dry_off) {
                        // Inclusive, and keeps firing until the cow is dried off
                        if today >= dry_off {
                            push(
                                report,
                                animal,
                                Severity::Critical,
                                AlertAction::DryOff,
                                format!("Dry off now: {}", animal.name),
                                format!(
                                    "Dry-off due {dry_off}, calving expected {expected_calving}"
                                ),
                            );
                        }
                    }
                }
                Ok(None) => pregnant_without_insemination(animal, &mut report.warnings),
                Err(()) => {}
            }
        }
    }

    fn calf_rules(&self, animal: &Animal, today: NaiveDate, report: &mut AlertReport) {
        let t = &self.thresholds;
        let Ok(birth) = read_date(animal, "birth_date", &animal.birth_date, &mut report.warnings)
        else {
            return;
        };
        // Unknown birth date counts as born today
        let age = birth.map_or(0, |born| days_between(born, today));

        if age <= i64::from(t.colostrum_window_days) && !animal.colostrum_given {
            push(
                report,
                animal,
                Severity::Critical,
                AlertAction::GiveColostrum,
                format!("Give colostrum: {}", animal.name),
                format!("Newborn, {age} days old"),
            );
        }

        if age >= i64::from(t.weaning_age_days) {
            push(
                report,
                animal,
                Severity::Warning,
                AlertAction::Wean,
                format!("Wean: {}", animal.name),
                format!("Age {age} days"),
            );
        }
    }
}

fn push(
    report: &mut AlertReport,
    animal: &Animal,
    severity: Severity,
    action: AlertAction,
    message: String,
    detail: String,
) {
    debug!(animal = %animal.id, action = action.as_str(), "alert raised");
    report.alerts.push(Alert {
        severity,
        message,
        detail,
        action,
        subject_id: animal.id.clone(),
    });
}

/// Evaluate the herd with the given windows.
pub fn compute_alerts(
    herd: &HerdSnapshot,
    today: NaiveDate,
    thresholds: &ReproductionThresholds,
) -> AlertReport {
    AlertEngine::new(thresholds.clone()).evaluate(herd, today)
}
