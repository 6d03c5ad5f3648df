use crate::cli::{Context, OutputFormat};
use crate::error::Result;
use crate::expiry::{due_vehicles, format_days_remaining, DueReport, DueState, TrackedField};
use crate::format::{cards, format_date};
use crate::snapshot::FleetSnapshot;

pub async fn execute(ctx: &Context, format: Option<OutputFormat>) -> Result<()> {
    let (snapshot, _) = ctx.load_snapshot().await?;
    let report = snapshot.due_report(ctx.window_days);

    match ctx.output_format(format) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", render_text(&snapshot, &report)),
    }

    Ok(())
}

pub fn render_text(snapshot: &FleetSnapshot, report: &DueReport) -> String {
    let mut lines = vec![
        format!(
            "Due within {} days of {}",
            report.window_days,
            format_date(Some(report.reference_date))
        ),
        format!("  {}: {}", cards::EXPIRING_SOON, report.expiring_count),
        format!("  {}: {}", cards::OIL_CHANGE_DUE, report.oil_change_due_count),
    ];

    for field in TrackedField::ALL {
        let due = report.field(field);
        lines.push(String::new());
        lines.push(format!("{} ({})", field.label_tr(), due.count));

        if due.vehicle_ids.is_empty() {
            lines.push("  -".to_string());
            continue;
        }

        let vehicles = due_vehicles(
            &snapshot.vehicles,
            field,
            report.reference_date,
            report.window_days,
        );
        for vehicle in vehicles {
            let date = field.date_of(vehicle);
            let state = DueState::classify(date, report.reference_date, report.window_days);
            let remaining = date
                .map(|d| format_days_remaining(d, report.reference_date))
                .unwrap_or_default();
            lines.push(format!(
                "  {:<32} {:<10}  {:<8}  {}",
                vehicle.display_name(),
                format_date(date),
                state.as_str(),
                remaining
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

    const SNAPSHOT: &str = r#"{"vehicles":[
        {"id":"v1","plate":"06 AA 1001","brand":"Mercedes","model":"Atego","insurance_expiry":"2025-03-10","kasko_expiry":"2025-02-20"},
        {"id":"v2","plate":"06 AA 1002","next_oil_change_date":"2025-03-01"}
    ]}"#;

    #[test]
    fn test_render_text() {
        let reference = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let snapshot = FleetSnapshot::from_json_str(SNAPSHOT, reference).unwrap();
        let report = snapshot.due_report(30);
        let text = render_text(&snapshot, &report);

        assert!(text.starts_with("Due within 30 days of 01.03.2025"));
        assert!(text.contains("Süre Dolacaklar: 1"));
        assert!(text.contains("Yağ Bakımı Yaklaşan: 1"));
        assert!(text.contains("Sigorta (1)"));
        assert!(text.contains("Muayene (0)"));
        assert!(text.contains("10.03.2025  DUE SOON  9 days"));
        assert!(text.contains("20.02.2025  OVERDUE   EXPIRED"));
        assert!(text.contains("01.03.2025  DUE SOON  today"));
    }

    #[test]
    fn test_render_text_lists_every_record_with_shared_id() {
        let json = r#"{"vehicles":[
            {"id":"dup","plate":"06 AA 2001","insurance_expiry":"2025-03-05"},
            {"id":"dup","plate":"06 AA 2002","insurance_expiry":"2025-03-06"}
        ]}"#;
        let reference = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let snapshot = FleetSnapshot::from_json_str(json, reference).unwrap();
        let report = snapshot.due_report(30);
        let text = render_text(&snapshot, &report);

        assert!(text.contains("Sigorta (2)"));
        assert!(text.contains("06 AA 2001"));
        assert!(text.contains("06 AA 2002"));
    }
}
