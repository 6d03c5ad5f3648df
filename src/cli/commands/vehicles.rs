use crate::cli::{Context, OutputFormat};
use crate::error::Result;
use crate::expiry::VehicleAlerts;
use crate::format::{format_date, format_km};
use crate::models::{Vehicle, VehicleStatus, VehicleType};
use crate::snapshot::{FleetSnapshot, VehicleFilter};
use serde::Serialize;

#[derive(Serialize)]
struct VehicleRow<'a> {
    #[serde(flatten)]
    vehicle: &'a Vehicle,
    alerts: VehicleAlerts,
}

pub async fn execute(
    ctx: &Context,
    status: Option<VehicleStatus>,
    vehicle_type: Option<VehicleType>,
    station: Option<String>,
    format: Option<OutputFormat>,
) -> Result<()> {
    let (snapshot, _) = ctx.load_snapshot().await?;
    let filter = VehicleFilter {
        status,
        vehicle_type,
        station_id: station,
    };
    let vehicles = snapshot.filter_vehicles(&filter);

    match ctx.output_format(format) {
        OutputFormat::Json => {
            let rows: Vec<VehicleRow> = vehicles
                .iter()
                .map(|v| VehicleRow {
                    vehicle: v,
                    alerts: snapshot.alerts_for(v, ctx.window_days),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Text => print!("{}", render_text(&snapshot, &vehicles, ctx.window_days)),
    }

    Ok(())
}

pub fn render_text(snapshot: &FleetSnapshot, vehicles: &[&Vehicle], window_days: i64) -> String {
    if vehicles.is_empty() {
        return "No vehicles match the given filters.\n".to_string();
    }

    let mut lines = vec![format!("Vehicles ({}):", vehicles.len()), String::new()];

    for vehicle in vehicles {
        let alerts = snapshot.alerts_for(vehicle, window_days);
        let mut flags = Vec::new();
        if alerts.expiring {
            flags.push("⚠ SÜRE DOLUYOR");
        }
        if alerts.oil_change_due {
            flags.push("⚠ YAĞ BAKIMI");
        }

        let station = snapshot
            .station_name(&vehicle.station_id)
            .unwrap_or(vehicle.station_id.as_str());

        lines.push(format!(
            "  {:<12} {:<12} {:<8} {:<14} {:>12}  {}",
            vehicle.plate,
            vehicle.vehicle_type.label_tr(),
            vehicle.status.label_tr(),
            station,
            format_km(vehicle.current_km),
            flags.join(" ")
        ));

        if alerts.oil_change_due {
            lines.push(format!(
                "      next oil change: {}",
                format_date(vehicle.next_oil_change_date)
            ));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_render_text_marks_warnings() {
        let json = r#"{
            "vehicles":[
                {"id":"v1","plate":"06 AA 1001","vehicle_type":"tanker","station_id":"s1","current_km":45000,"inspection_expiry":"2025-03-05"},
                {"id":"v2","plate":"06 AA 1002","vehicle_type":"rescue","status":"accident","station_id":"s1","next_oil_change_date":"2025-02-01"},
                {"id":"v3","plate":"06 AA 1003","station_id":"s9"}
            ],
            "stations":[{"id":"s1","name":"Merkez"}]
        }"#;
        let reference = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let snapshot = FleetSnapshot::from_json_str(json, reference).unwrap();
        let vehicles = snapshot.filter_vehicles(&VehicleFilter::default());
        let text = render_text(&snapshot, &vehicles, 30);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Vehicles (3):");
        assert!(lines[2].contains("Tanker") && lines[2].contains("Merkez"));
        assert!(lines[2].contains("45.000 KM"));
        assert!(lines[2].contains("SÜRE DOLUYOR"));
        assert!(!lines[2].contains("YAĞ BAKIMI"));
        assert!(lines[3].contains("Kazalı") && lines[3].contains("YAĞ BAKIMI"));
        assert!(lines[4].contains("01.02.2025"));
        assert!(lines[5].contains("s9") && !lines[5].contains('⚠'));
    }

    #[test]
    fn test_render_text_empty() {
        let reference = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let snapshot = FleetSnapshot::from_json_str("{}", reference).unwrap();
        assert_eq!(
            render_text(&snapshot, &[], 30),
            "No vehicles match the given filters.\n"
        );
    }
}
