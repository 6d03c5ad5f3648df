use crate::cli::{Context, OutputFormat};
use crate::error::Result;
use crate::format::{cards, format_date, format_percent};
use crate::models::VehicleStatus;
use crate::stats::{DashboardStats, StatsScope};
use serde::Serialize;

#[derive(Serialize)]
struct DashboardOutput<'a> {
    #[serde(flatten)]
    stats: &'a DashboardStats,
    active_ratio_percent: u32,
    station_id: Option<&'a str>,
}

pub async fn execute(
    ctx: &Context,
    format: Option<OutputFormat>,
    station: Option<String>,
) -> Result<()> {
    let (snapshot, session) = ctx.load_snapshot().await?;

    let scope = match (station, &session) {
        (Some(id), _) => StatsScope::Station(id),
        (None, Some(session)) => StatsScope::for_user(&session.user),
        (None, None) => StatsScope::Fleet,
    };
    tracing::debug!("Dashboard scope: {:?}", scope);

    let stats = snapshot.dashboard_stats(&scope, ctx.window_days);
    // Drivers don't see fleet-wide station and driver totals
    let show_totals = session.as_ref().map_or(true, |s| !s.user.is_driver());

    match ctx.output_format(format) {
        OutputFormat::Json => {
            let output = DashboardOutput {
                stats: &stats,
                active_ratio_percent: stats.active_ratio_percent(),
                station_id: match &scope {
                    StatsScope::Station(id) => Some(id.as_str()),
                    StatsScope::Fleet => None,
                },
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            let station_name = match &scope {
                StatsScope::Station(id) => Some(snapshot.station_name(id).unwrap_or(id.as_str())),
                StatsScope::Fleet => None,
            };
            print!("{}", render_text(&stats, station_name, show_totals));
        }
    }

    Ok(())
}

pub fn render_text(stats: &DashboardStats, station_name: Option<&str>, show_totals: bool) -> String {
    let title = match station_name {
        Some(name) => format!("Dashboard - {} ({})", name, format_date(Some(stats.reference_date))),
        None => format!("Dashboard ({})", format_date(Some(stats.reference_date))),
    };

    let mut rows = vec![(cards::TOTAL_VEHICLES, stats.total_vehicles.to_string())];
    for status in VehicleStatus::ALL {
        rows.push((cards::for_status(status), stats.count_by_status(status).to_string()));
    }
    rows.extend([
        (cards::PENDING_FAULTS, stats.pending_faults.to_string()),
        (cards::EXPIRING_SOON, stats.expiring_soon.to_string()),
        (cards::OIL_CHANGE_DUE, stats.oil_change_due_soon.to_string()),
    ]);
    if show_totals {
        rows.push((cards::TOTAL_STATIONS, stats.total_stations.to_string()));
        rows.push((cards::TOTAL_DRIVERS, stats.total_drivers.to_string()));
    }
    rows.push((cards::ACTIVE_RATIO, format_percent(stats.active_ratio_percent())));

    let mut lines = vec![title];
    for (label, value) in rows {
        lines.push(format!("  {:<22} {:>6}", label, value));
    }
    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::build_dashboard_stats;
    use chrono::NaiveDate;

    #[test]
    fn test_render_empty_fleet() {
        let reference = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let stats = build_dashboard_stats(&[], &[], &[], &[], reference, 30);

        let text = render_text(&stats, None, true);
        assert!(text.starts_with("Dashboard (01.03.2025)"));
        assert!(text.contains("Toplam Şoför"));
        assert!(text.contains("%0"));

        let text = render_text(&stats, Some("Merkez"), false);
        assert!(text.starts_with("Dashboard - Merkez (01.03.2025)"));
        assert!(!text.contains("Toplam İstasyon"));
    }

    #[test]
    fn test_render_status_rows_in_order() {
        let reference = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut vehicles = Vec::new();
        for (id, status) in [
            ("a", VehicleStatus::Active),
            ("b", VehicleStatus::Faulty),
            ("c", VehicleStatus::Faulty),
            ("d", VehicleStatus::Accident),
        ] {
            let mut v = crate::models::Vehicle::new(id, id);
            v.status = status;
            vehicles.push(v);
        }
        let stats = build_dashboard_stats(&vehicles, &[], &[], &[], reference, 30);
        let text = render_text(&stats, None, true);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[1].contains("Toplam Araç") && lines[1].ends_with('4'));
        assert!(lines[2].contains("Faal Araçlar") && lines[2].ends_with('1'));
        assert!(lines[3].contains("Arızalı Araçlar") && lines[3].ends_with('2'));
        assert!(lines[4].contains("Kazalı Araçlar") && lines[4].ends_with('1'));
        assert!(text.contains("%25"));
    }

    #[test]
    fn test_json_output_flattens_stats() {
        let reference = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let stats = build_dashboard_stats(&[], &[], &[], &[], reference, 30);
        let output = DashboardOutput {
            stats: &stats,
            active_ratio_percent: 0,
            station_id: None,
        };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["total_vehicles"], 0);
        assert_eq!(json["expiring_soon"], 0);
        assert_eq!(json["active_ratio_percent"], 0);
    }
}
