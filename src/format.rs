// tr-TR display formatting
use chrono::NaiveDate;

/// `dd.MM.yyyy`, or `-` for an absent date
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%d.%m.%Y").to_string(),
        None => "-".to_string(),
    }
}

/// Group digits with dots: 1234567 -> "1.234.567"
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

pub fn format_km(km: u64) -> String {
    format!("{} KM", group_thousands(km))
}

/// Signed distance in kilometres, e.g. for mileage left until an oil change
pub fn format_km_delta(km: i64) -> String {
    let formatted = format_km(km.unsigned_abs());
    if km < 0 {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Turkish places the percent sign first
pub fn format_percent(percent: u32) -> String {
    format!("%{}", percent)
}

/// Titles of the dashboard cards
pub mod cards {
    use crate::models::VehicleStatus;

    pub const TOTAL_VEHICLES: &str = "Toplam Araç";
    pub const ACTIVE_VEHICLES: &str = "Faal Araçlar";
    pub const FAULTY_VEHICLES: &str = "Arızalı Araçlar";
    pub const ACCIDENT_VEHICLES: &str = "Kazalı Araçlar";
    pub const PENDING_FAULTS: &str = "Bekleyen Arızalar";
    pub const EXPIRING_SOON: &str = "Süre Dolacaklar";
    pub const OIL_CHANGE_DUE: &str = "Yağ Bakımı Yaklaşan";
    pub const TOTAL_STATIONS: &str = "Toplam İstasyon";
    pub const TOTAL_DRIVERS: &str = "Toplam Şoför";
    pub const ACTIVE_RATIO: &str = "Faal Oranı";

    pub fn for_status(status: VehicleStatus) -> &'static str {
        match status {
            VehicleStatus::Active => ACTIVE_VEHICLES,
            VehicleStatus::Faulty => FAULTY_VEHICLES,
            VehicleStatus::Accident => ACCIDENT_VEHICLES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2025, 3, 7)), "07.03.2025");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1.000");
        assert_eq!(group_thousands(45000), "45.000");
        assert_eq!(group_thousands(1234567), "1.234.567");
    }

    #[test]
    fn test_format_km() {
        assert_eq!(format_km(45000), "45.000 KM");
        assert_eq!(format_km_delta(8000), "8.000 KM");
        assert_eq!(format_km_delta(-1500), "-1.500 KM");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(70), "%70");
        assert_eq!(format_percent(0), "%0");
    }
}
