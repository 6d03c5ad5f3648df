// Dashboard statistics
use crate::expiry::aggregate_due;
use crate::models::{Fault, Station, User, Vehicle, VehicleStatus};
use chrono::NaiveDate;
use serde::Serialize;
use std::borrow::Cow;

/// Which vehicles the dashboard counts cover
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatsScope {
    #[default]
    Fleet,
    Station(String),
}

impl StatsScope {
    /// Drivers attached to a station only see that station's vehicles
    pub fn for_user(user: &User) -> Self {
        match (&user.station_id, user.is_driver()) {
            (Some(station_id), true) if !station_id.is_empty() => {
                StatsScope::Station(station_id.clone())
            }
            _ => StatsScope::Fleet,
        }
    }

    pub fn includes(&self, vehicle: &Vehicle) -> bool {
        match self {
            StatsScope::Fleet => true,
            StatsScope::Station(id) => vehicle.station_id == *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub reference_date: NaiveDate,
    pub total_vehicles: usize,
    pub active_vehicles: usize,
    pub faulty_vehicles: usize,
    pub accident_vehicles: usize,
    pub pending_faults: usize,
    pub expiring_soon: usize,
    pub oil_change_due_soon: usize,
    pub total_stations: usize,
    pub total_drivers: usize,
    /// Active vehicles over total, 0 for an empty fleet
    pub active_ratio: f64,
}

impl DashboardStats {
    pub fn active_ratio_percent(&self) -> u32 {
        (self.active_ratio * 100.0).round() as u32
    }

    pub fn count_by_status(&self, status: VehicleStatus) -> usize {
        match status {
            VehicleStatus::Active => self.active_vehicles,
            VehicleStatus::Faulty => self.faulty_vehicles,
            VehicleStatus::Accident => self.accident_vehicles,
        }
    }
}

pub fn active_ratio(active: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        active as f64 / total as f64
    }
}

/// Fleet-wide dashboard counts; see [`build_scoped_dashboard_stats`] for station views
pub fn build_dashboard_stats(
    vehicles: &[Vehicle],
    faults: &[Fault],
    stations: &[Station],
    users: &[User],
    reference: NaiveDate,
    window_days: i64,
) -> DashboardStats {
    build_scoped_dashboard_stats(
        vehicles,
        faults,
        stations,
        users,
        reference,
        window_days,
        &StatsScope::Fleet,
    )
}

/// Vehicle-derived counts follow `scope`; faults, stations and drivers stay fleet-wide
pub fn build_scoped_dashboard_stats(
    vehicles: &[Vehicle],
    faults: &[Fault],
    stations: &[Station],
    users: &[User],
    reference: NaiveDate,
    window_days: i64,
    scope: &StatsScope,
) -> DashboardStats {
    let scoped: Cow<'_, [Vehicle]> = match scope {
        StatsScope::Fleet => Cow::Borrowed(vehicles),
        StatsScope::Station(_) => Cow::Owned(
            vehicles
                .iter()
                .filter(|v| scope.includes(v))
                .cloned()
                .collect(),
        ),
    };

    let count_status = |status: VehicleStatus| scoped.iter().filter(|v| v.status == status).count();
    let active_vehicles = count_status(VehicleStatus::Active);
    let due = aggregate_due(&scoped, reference, window_days);

    DashboardStats {
        reference_date: reference,
        total_vehicles: scoped.len(),
        active_vehicles,
        faulty_vehicles: count_status(VehicleStatus::Faulty),
        accident_vehicles: count_status(VehicleStatus::Accident),
        pending_faults: faults.iter().filter(|f| f.is_pending()).count(),
        expiring_soon: due.expiring_count,
        oil_change_due_soon: due.oil_change_due_count,
        total_stations: stations.len(),
        total_drivers: users.iter().filter(|u| u.is_driver()).count(),
        active_ratio: active_ratio(active_vehicles, scoped.len()),
    }
}
