// Fleet-wide aggregation of due-soon classifications
use super::{is_due_soon, TrackedField};
use crate::models::Vehicle;
use chrono::NaiveDate;
use serde::Serialize;

/// Vehicles due for one tracked field, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldDue {
    pub count: usize,
    pub vehicle_ids: Vec<String>,
}

impl FieldDue {
    fn push(&mut self, vehicle_id: &str) {
        self.count += 1;
        self.vehicle_ids.push(vehicle_id.to_string());
    }

    pub fn contains(&self, vehicle_id: &str) -> bool {
        self.vehicle_ids.iter().any(|id| id == vehicle_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueReport {
    pub reference_date: NaiveDate,
    pub window_days: i64,
    pub insurance: FieldDue,
    pub inspection: FieldDue,
    pub kasko: FieldDue,
    pub oil_change: FieldDue,
    /// Distinct vehicles with insurance, inspection or kasko due
    pub expiring_count: usize,
    /// Vehicles with the next oil change due; not part of `expiring_count`
    pub oil_change_due_count: usize,
}

impl DueReport {
    fn empty(reference_date: NaiveDate, window_days: i64) -> Self {
        Self {
            reference_date,
            window_days,
            insurance: FieldDue::default(),
            inspection: FieldDue::default(),
            kasko: FieldDue::default(),
            oil_change: FieldDue::default(),
            expiring_count: 0,
            oil_change_due_count: 0,
        }
    }

    pub fn field(&self, field: TrackedField) -> &FieldDue {
        match field {
            TrackedField::Insurance => &self.insurance,
            TrackedField::Inspection => &self.inspection,
            TrackedField::Kasko => &self.kasko,
            TrackedField::OilChange => &self.oil_change,
        }
    }

    fn field_mut(&mut self, field: TrackedField) -> &mut FieldDue {
        match field {
            TrackedField::Insurance => &mut self.insurance,
            TrackedField::Inspection => &mut self.inspection,
            TrackedField::Kasko => &mut self.kasko,
            TrackedField::OilChange => &mut self.oil_change,
        }
    }

    pub fn is_empty(&self) -> bool {
        TrackedField::ALL.iter().all(|f| self.field(*f).count == 0)
    }
}

/// Classify every vehicle against one reference date in a single pass
pub fn aggregate_due(vehicles: &[Vehicle], reference: NaiveDate, window_days: i64) -> DueReport {
    let mut report = DueReport::empty(reference, window_days);

    for vehicle in vehicles {
        let mut expiring = false;
        for field in TrackedField::ALL {
            if !is_due_soon(field.date_of(vehicle), reference, window_days) {
                continue;
            }
            report.field_mut(field).push(&vehicle.id);
            expiring |= field.is_document();
        }
        if expiring {
            report.expiring_count += 1;
        }
    }

    report.oil_change_due_count = report.oil_change.count;

    tracing::debug!(
        "Aggregated {} vehicles at {}: {} expiring, {} oil changes due",
        vehicles.len(),
        reference,
        report.expiring_count,
        report.oil_change_due_count
    );

    report
}

/// Vehicles due for one field, borrowed in input order
pub fn due_vehicles(
    vehicles: &[Vehicle],
    field: TrackedField,
    reference: NaiveDate,
    window_days: i64,
) -> Vec<&Vehicle> {
    vehicles
        .iter()
        .filter(|v| is_due_soon(field.date_of(v), reference, window_days))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expiry::DEFAULT_WINDOW_DAYS;
    use chrono::Duration;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn offset(days: i64) -> Option<NaiveDate> {
        Some(reference() + Duration::days(days))
    }

    fn vehicle(id: &str) -> Vehicle {
        Vehicle::new(id, format!("PLATE-{}", id))
    }

    #[test]
    fn test_empty_fleet() {
        let report = aggregate_due(&[], reference(), DEFAULT_WINDOW_DAYS);
        assert!(report.is_empty());
        assert_eq!(report.expiring_count, 0);
        assert_eq!(report.oil_change_due_count, 0);
        for field in TrackedField::ALL {
            assert_eq!(report.field(field), &FieldDue::default());
        }
    }

    #[test]
    fn test_insurance_due_and_inspection_outside_window() {
        let mut a = vehicle("a");
        a.insurance_expiry = offset(10);
        let mut b = vehicle("b");
        b.inspection_expiry = offset(40);

        let report = aggregate_due(&[a, b], reference(), DEFAULT_WINDOW_DAYS);
        assert_eq!(report.insurance.count, 1);
        assert_eq!(report.insurance.vehicle_ids, vec!["a".to_string()]);
        assert_eq!(report.inspection.count, 0);
        assert_eq!(report.expiring_count, 1);
    }

    #[test]
    fn test_vehicle_with_several_documents_counts_once() {
        let mut a = vehicle("a");
        a.insurance_expiry = offset(3);
        a.kasko_expiry = offset(-2);

        let report = aggregate_due(&[a], reference(), DEFAULT_WINDOW_DAYS);
        assert!(report.insurance.contains("a"));
        assert!(report.kasko.contains("a"));
        assert_eq!(report.expiring_count, 1);
    }

    #[test]
    fn test_oil_change_is_tracked_separately() {
        let mut a = vehicle("a");
        a.next_oil_change_date = offset(7);
        let mut b = vehicle("b");
        b.next_oil_change_date = offset(60);
        b.inspection_expiry = offset(1);

        let report = aggregate_due(&[a, b], reference(), DEFAULT_WINDOW_DAYS);
        assert_eq!(report.oil_change_due_count, 1);
        assert_eq!(report.oil_change.vehicle_ids, vec!["a".to_string()]);
        assert_eq!(report.expiring_count, 1);
        assert!(report.inspection.contains("b"));
    }

    #[test]
    fn test_lists_keep_input_order() {
        let mut vehicles = Vec::new();
        for (id, days) in [("c", 25), ("a", 2), ("b", -5)] {
            let mut v = vehicle(id);
            v.insurance_expiry = offset(days);
            vehicles.push(v);
        }

        let report = aggregate_due(&vehicles, reference(), DEFAULT_WINDOW_DAYS);
        assert_eq!(report.insurance.vehicle_ids, vec!["c", "a", "b"]);
        assert_eq!(report.expiring_count, 3);
    }

    #[test]
    fn test_report_is_deterministic() {
        let mut a = vehicle("a");
        a.kasko_expiry = offset(30);
        let mut b = vehicle("b");
        b.kasko_expiry = offset(31);
        let vehicles = vec![a, b];

        let first = aggregate_due(&vehicles, reference(), DEFAULT_WINDOW_DAYS);
        let second = aggregate_due(&vehicles, reference(), DEFAULT_WINDOW_DAYS);
        assert_eq!(first, second);
        assert_eq!(first.kasko.vehicle_ids, vec!["a"]);
    }

    #[test]
    fn test_due_vehicles_borrows_matching_records() {
        let mut a = vehicle("a");
        a.next_oil_change_date = offset(-1);
        let b = vehicle("b");
        let vehicles = vec![a, b];

        let due = due_vehicles(&vehicles, TrackedField::OilChange, reference(), 30);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, "a");
    }

    #[test]
    fn test_report_serializes_field_names() {
        let report = aggregate_due(&[], reference(), 30);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["reference_date"], "2025-03-01");
        assert_eq!(json["expiring_count"], 0);
        assert!(json["oil_change"]["vehicle_ids"].as_array().unwrap().is_empty());
    }
}
