use crate::cli::{Context, OutputFormat};
use crate::error::Result;
use crate::expiry::{due_vehicles, format_days_remaining, TrackedField};
use crate::format::{format_date, format_km, format_km_delta};
use crate::models::Vehicle;
use crate::snapshot::FleetSnapshot;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct MaintenanceItem<'a> {
    id: &'a str,
    plate: &'a str,
    due_date: Option<NaiveDate>,
    current_km: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_oil_change_km: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    km_remaining: Option<i64>,
}

#[derive(Debug, Serialize)]
struct MaintenanceOutput<'a> {
    reference_date: NaiveDate,
    window_days: i64,
    oil_change: Vec<MaintenanceItem<'a>>,
    inspection: Vec<MaintenanceItem<'a>>,
}

fn item(vehicle: &Vehicle, field: TrackedField) -> MaintenanceItem<'_> {
    let oil = field == TrackedField::OilChange;
    MaintenanceItem {
        id: &vehicle.id,
        plate: &vehicle.plate,
        due_date: field.date_of(vehicle),
        current_km: vehicle.current_km,
        next_oil_change_km: vehicle.next_oil_change_km.filter(|km| oil && *km > 0),
        km_remaining: vehicle.oil_change_km_remaining().filter(|_| oil),
    }
}

fn items(snapshot: &FleetSnapshot, field: TrackedField, window_days: i64) -> Vec<MaintenanceItem<'_>> {
    due_vehicles(&snapshot.vehicles, field, snapshot.reference_date, window_days)
        .into_iter()
        .map(|v| item(v, field))
        .collect()
}

fn build_output(snapshot: &FleetSnapshot, window_days: i64) -> MaintenanceOutput<'_> {
    MaintenanceOutput {
        reference_date: snapshot.reference_date,
        window_days,
        oil_change: items(snapshot, TrackedField::OilChange, window_days),
        inspection: items(snapshot, TrackedField::Inspection, window_days),
    }
}

pub async fn execute(ctx: &Context, format: Option<OutputFormat>) -> Result<()> {
    let (snapshot, _) = ctx.load_snapshot().await?;

    match ctx.output_format(format) {
        OutputFormat::Json => {
            let output = build_output(&snapshot, ctx.window_days);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => print!("{}", render_text(&snapshot, ctx.window_days)),
    }

    Ok(())
}

pub fn render_text(snapshot: &FleetSnapshot, window_days: i64) -> String {
    let output = build_output(snapshot, window_days);
    let mut lines = Vec::new();

    lines.push(format!(
        "{} ({})",
        TrackedField::OilChange.label_tr(),
        output.oil_change.len()
    ));
    if output.oil_change.is_empty() {
        lines.push("  -".to_string());
    }
    for entry in &output.oil_change {
        let mut line = format!(
            "  {:<12} next: {}",
            entry.plate,
            format_date(entry.due_date)
        );
        if let Some(date) = entry.due_date {
            line.push_str(&format!(" ({})", format_days_remaining(date, output.reference_date)));
        }
        line.push_str(&format!("  current: {}", format_km(entry.current_km)));
        if let Some(km) = entry.next_oil_change_km {
            line.push_str(&format!("  due at: {}", format_km(km)));
        }
        if let Some(left) = entry.km_remaining {
            line.push_str(&format!("  left: {}", format_km_delta(left)));
        }
        lines.push(line);
    }

    lines.push(String::new());
    lines.push(format!(
        "{} ({})",
        TrackedField::Inspection.label_tr(),
        output.inspection.len()
    ));
    if output.inspection.is_empty() {
        lines.push("  -".to_string());
    }
    for entry in &output.inspection {
        let remaining = entry
            .due_date
            .map(|d| format_days_remaining(d, output.reference_date))
            .unwrap_or_default();
        lines.push(format!(
            "  {:<12} expires: {}  {}",
            entry.plate,
            format_date(entry.due_date),
            remaining
        ));
    }

    lines.push(String::new());
    lines.join("\n")
}
