// A consistent view of the fleet evaluated against one reference date
use crate::api::ApiClient;
use crate::error::{FleetError, Result};
use crate::expiry::{aggregate_due, DueReport, VehicleAlerts};
use crate::models::{Fault, Station, User, Vehicle, VehicleStatus, VehicleType};
use crate::stats::{build_scoped_dashboard_stats, DashboardStats, StatsScope};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Collections as stored in a snapshot file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotData {
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub faults: Vec<Fault>,
    #[serde(default)]
    pub stations: Vec<Station>,
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Clone)]
pub struct FleetSnapshot {
    pub vehicles: Vec<Vehicle>,
    pub faults: Vec<Fault>,
    pub stations: Vec<Station>,
    pub users: Vec<User>,
    pub reference_date: NaiveDate,
}

/// List-view filters; `None` matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleFilter {
    pub status: Option<VehicleStatus>,
    pub vehicle_type: Option<VehicleType>,
    pub station_id: Option<String>,
}

impl VehicleFilter {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.status.map_or(true, |s| vehicle.status == s)
            && self.vehicle_type.map_or(true, |t| vehicle.vehicle_type == t)
            && self
                .station_id
                .as_deref()
                .map_or(true, |id| vehicle.station_id == id)
    }
}

impl FleetSnapshot {
    pub fn new(data: SnapshotData, reference_date: NaiveDate) -> Self {
        Self {
            vehicles: data.vehicles,
            faults: data.faults,
            stations: data.stations,
            users: data.users,
            reference_date,
        }
    }

    /// Load collections exported to a JSON file
    pub fn from_json_file(path: &Path, reference_date: NaiveDate) -> Result<Self> {
        tracing::debug!("Loading snapshot from: {}", path.display());
        let contents = fs::read_to_string(path).map_err(|e| {
            FleetError::Snapshot(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents, reference_date)
    }

    pub fn from_json_str(contents: &str, reference_date: NaiveDate) -> Result<Self> {
        let data: SnapshotData = serde_json::from_str(contents)
            .map_err(|e| FleetError::Snapshot(format!("Invalid snapshot: {}", e)))?;
        Ok(Self::new(data, reference_date))
    }

    /// Fetch every collection from the API in parallel
    pub async fn fetch(client: &ApiClient, reference_date: NaiveDate) -> Result<Self> {
        let (vehicles, faults, stations, users) = tokio::try_join!(
            client.vehicles(),
            client.faults(),
            client.stations(),
            client.users(),
        )?;

        tracing::debug!(
            "Fetched {} vehicles, {} faults, {} stations, {} users",
            vehicles.len(),
            faults.len(),
            stations.len(),
            users.len()
        );

        Ok(Self {
            vehicles,
            faults,
            stations,
            users,
            reference_date,
        })
    }

    pub fn due_report(&self, window_days: i64) -> DueReport {
        aggregate_due(&self.vehicles, self.reference_date, window_days)
    }

    pub fn dashboard_stats(&self, scope: &StatsScope, window_days: i64) -> DashboardStats {
        build_scoped_dashboard_stats(
            &self.vehicles,
            &self.faults,
            &self.stations,
            &self.users,
            self.reference_date,
            window_days,
            scope,
        )
    }

    pub fn alerts_for(&self, vehicle: &Vehicle, window_days: i64) -> VehicleAlerts {
        VehicleAlerts::evaluate(vehicle, self.reference_date, window_days)
    }

    pub fn filter_vehicles(&self, filter: &VehicleFilter) -> Vec<&Vehicle> {
        self.vehicles.iter().filter(|v| filter.matches(v)).collect()
    }

    pub fn station_name(&self, id: &str) -> Option<&str> {
        self.stations
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn find<'a>(snapshot: &'a FleetSnapshot, id: &str) -> &'a Vehicle {
        snapshot.vehicles.iter().find(|v| v.id == id).unwrap()
    }

    const SAMPLE: &str = r#"{
        "vehicles": [
            {"id":"v1","plate":"06 AA 1001","vehicle_type":"tanker","status":"active","station_id":"s1",
             "insurance_expiry":"2025-03-10","kasko_expiry":"2025-02-01T00:00:00+00:00","current_km":45000},
            {"id":"v2","plate":"06 AA 1002","vehicle_type":"ladder","status":"faulty","station_id":"s1",
             "next_oil_change_date":"2025-03-20","inspection_expiry":"2025-06-01"},
            {"id":"v3","plate":"06 AA 1003","vehicle_type":"tanker","status":"active","station_id":"s2",
             "insurance_expiry":"","inspection_expiry":null}
        ],
        "faults": [{"id":"f1","vehicle_id":"v2","status":"pending"}],
        "stations": [{"id":"s1","name":"Merkez"},{"id":"s2","name":"Kuzey"}],
        "users": [{"id":"u1","role":"driver","station_id":"s1"},{"id":"u2","role":"manager"}]
    }"#;

    #[test]
    fn test_from_json_str() {
        let snapshot = FleetSnapshot::from_json_str(SAMPLE, reference()).unwrap();
        assert_eq!(snapshot.vehicles.len(), 3);
        assert_eq!(snapshot.station_name("s2"), Some("Kuzey"));
        assert_eq!(find(&snapshot, "v3").insurance_expiry, None);
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let snapshot = FleetSnapshot::from_json_str(r#"{"vehicles":[]}"#, reference()).unwrap();
        assert!(snapshot.faults.is_empty());
        assert!(snapshot.users.is_empty());
        assert!(snapshot.due_report(30).is_empty());
    }

    #[test]
    fn test_malformed_date_is_rejected() {
        let json = r#"{"vehicles":[{"id":"v1","plate":"P","insurance_expiry":"31/12/2025"}]}"#;
        let err = FleetSnapshot::from_json_str(json, reference()).unwrap_err();
        assert!(matches!(err, FleetError::Snapshot(ref msg) if msg.contains("31/12/2025")));
    }

    #[test]
    fn test_form_edited_mileage_does_not_break_load() {
        let json = r#"{"vehicles":[
            {"id":"v1","plate":"06 AA 1001","next_oil_change_date":"2025-03-10"},
            {"id":"v2","plate":"06 AA 1002","current_km":"54000","next_oil_change_km":"",
             "last_oil_change_km":"53000","next_oil_change_date":"2025-03-20"}
        ]}"#;
        let snapshot = FleetSnapshot::from_json_str(json, reference()).unwrap();

        let v2 = find(&snapshot, "v2");
        assert_eq!(v2.current_km, 54000);
        assert_eq!(v2.next_oil_change_km, None);
        assert_eq!(snapshot.due_report(30).oil_change.vehicle_ids, vec!["v1", "v2"]);
    }

    #[test]
    fn test_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let snapshot = FleetSnapshot::from_json_file(file.path(), reference()).unwrap();
        assert_eq!(snapshot.reference_date, reference());
        assert_eq!(snapshot.stations.len(), 2);

        assert!(FleetSnapshot::from_json_file(Path::new("/nonexistent/snap.json"), reference())
            .is_err());
    }

    #[test]
    fn test_reports_use_single_reference_date() {
        let snapshot = FleetSnapshot::from_json_str(SAMPLE, reference()).unwrap();

        let report = snapshot.due_report(30);
        assert_eq!(report.reference_date, reference());
        assert_eq!(report.insurance.vehicle_ids, vec!["v1"]);
        assert_eq!(report.kasko.vehicle_ids, vec!["v1"]);
        assert_eq!(report.oil_change.vehicle_ids, vec!["v2"]);
        assert_eq!(report.inspection.count, 0);
        assert_eq!(report.expiring_count, 1);

        let stats = snapshot.dashboard_stats(&StatsScope::Fleet, 30);
        assert_eq!(stats.total_vehicles, 3);
        assert_eq!(stats.active_ratio_percent(), 67);
        assert_eq!(stats.pending_faults, 1);
        assert_eq!(stats.total_drivers, 1);
        assert_eq!(stats.expiring_soon, 1);
        assert_eq!(stats.oil_change_due_soon, 1);

        let station = snapshot.dashboard_stats(&StatsScope::Station("s2".to_string()), 30);
        assert_eq!(station.total_vehicles, 1);
        assert_eq!(station.expiring_soon, 0);
    }

    #[test]
    fn test_filter_vehicles() {
        let snapshot = FleetSnapshot::from_json_str(SAMPLE, reference()).unwrap();

        let all = snapshot.filter_vehicles(&VehicleFilter::default());
        assert_eq!(all.len(), 3);

        let tankers = snapshot.filter_vehicles(&VehicleFilter {
            vehicle_type: Some(VehicleType::Tanker),
            ..Default::default()
        });
        let ids: Vec<&str> = tankers.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "v3"]);

        let faulty_in_s1 = snapshot.filter_vehicles(&VehicleFilter {
            status: Some(VehicleStatus::Faulty),
            station_id: Some("s1".to_string()),
            ..Default::default()
        });
        assert_eq!(faulty_in_s1.len(), 1);
        assert_eq!(faulty_in_s1[0].id, "v2");
    }

    #[test]
    fn test_alerts_for() {
        let snapshot = FleetSnapshot::from_json_str(SAMPLE, reference()).unwrap();
        let v2 = find(&snapshot, "v2");
        let alerts = snapshot.alerts_for(v2, 30);
        assert!(!alerts.expiring);
        assert!(alerts.oil_change_due);
    }
}
