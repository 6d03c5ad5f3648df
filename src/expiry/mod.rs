// Expiry tracking for vehicle documents and maintenance schedules
pub mod report;

pub use report::{aggregate_due, due_vehicles, DueReport, FieldDue};

use crate::models::Vehicle;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

/// Look-ahead window used by every due-soon check unless configured otherwise
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// True when `target` falls on or before `reference + window_days`.
///
/// Absent dates are never due. Dates already in the past are due.
pub fn is_due_soon(target: Option<NaiveDate>, reference: NaiveDate, window_days: i64) -> bool {
    let Some(date) = target else {
        return false;
    };

    match Duration::try_days(window_days).and_then(|d| reference.checked_add_signed(d)) {
        Some(limit) => date <= limit,
        // Window reaches past the calendar range: everything or nothing is inside it
        None => window_days > 0,
    }
}

/// Signed number of days from `reference` to `target`
pub fn days_until(target: NaiveDate, reference: NaiveDate) -> i64 {
    (target - reference).num_days()
}

pub fn format_days_remaining(target: NaiveDate, reference: NaiveDate) -> String {
    match days_until(target, reference) {
        d if d < 0 => "EXPIRED".to_string(),
        0 => "today".to_string(),
        1 => "1 day".to_string(),
        d => format!("{} days", d),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueState {
    Overdue,
    DueSoon,
    Ok,
    NotApplicable,
}

impl DueState {
    pub fn classify(target: Option<NaiveDate>, reference: NaiveDate, window_days: i64) -> Self {
        match target {
            None => DueState::NotApplicable,
            Some(date) if date < reference => DueState::Overdue,
            Some(_) if is_due_soon(target, reference, window_days) => DueState::DueSoon,
            Some(_) => DueState::Ok,
        }
    }

    /// Overdue items belong to the due-soon set
    pub fn is_due(&self) -> bool {
        matches!(self, DueState::Overdue | DueState::DueSoon)
    }

    pub fn as_str(&self) -> &str {
        match self {
            DueState::Overdue => "OVERDUE",
            DueState::DueSoon => "DUE SOON",
            DueState::Ok => "OK",
            DueState::NotApplicable => "-",
        }
    }
}

/// Date fields of a vehicle that are tracked for expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedField {
    Insurance,
    Inspection,
    Kasko,
    OilChange,
}

impl TrackedField {
    pub const ALL: [TrackedField; 4] = [
        TrackedField::Insurance,
        TrackedField::Inspection,
        TrackedField::Kasko,
        TrackedField::OilChange,
    ];

    /// Fields that feed the combined expiring count
    pub const DOCUMENTS: [TrackedField; 3] = [
        TrackedField::Insurance,
        TrackedField::Inspection,
        TrackedField::Kasko,
    ];

    pub fn date_of(&self, vehicle: &Vehicle) -> Option<NaiveDate> {
        match self {
            TrackedField::Insurance => vehicle.insurance_expiry,
            TrackedField::Inspection => vehicle.inspection_expiry,
            TrackedField::Kasko => vehicle.kasko_expiry,
            TrackedField::OilChange => vehicle.next_oil_change_date,
        }
    }

    pub fn is_document(&self) -> bool {
        !matches!(self, TrackedField::OilChange)
    }

    pub fn label_tr(&self) -> &'static str {
        match self {
            TrackedField::Insurance => "Sigorta",
            TrackedField::Inspection => "Muayene",
            TrackedField::Kasko => "Kasko",
            TrackedField::OilChange => "Yağ Bakımı",
        }
    }
}

/// Warning flags shown next to a vehicle in list views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct VehicleAlerts {
    /// Insurance, inspection or kasko is due
    pub expiring: bool,
    pub oil_change_due: bool,
}

impl VehicleAlerts {
    pub fn evaluate(vehicle: &Vehicle, reference: NaiveDate, window_days: i64) -> Self {
        let expiring = TrackedField::DOCUMENTS
            .iter()
            .any(|field| is_due_soon(field.date_of(vehicle), reference, window_days));
        let oil_change_due = is_due_soon(
            TrackedField::OilChange.date_of(vehicle),
            reference,
            window_days,
        );

        Self {
            expiring,
            oil_change_due,
        }
    }

    pub fn any(&self) -> bool {
        self.expiring || self.oil_change_due
    }
}
