use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operational status of a vehicle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    #[default]
    Active,
    Faulty,
    Accident,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 3] = [
        VehicleStatus::Active,
        VehicleStatus::Faulty,
        VehicleStatus::Accident,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "active",
            VehicleStatus::Faulty => "faulty",
            VehicleStatus::Accident => "accident",
        }
    }

    pub fn label_tr(&self) -> &'static str {
        match self {
            VehicleStatus::Active => "Faal",
            VehicleStatus::Faulty => "Arızalı",
            VehicleStatus::Accident => "Kazalı",
        }
    }
}

/// Apparatus type of a fire-department vehicle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Ladder,
    Tanker,
    Snorkel,
    Terrain,
    Rescue,
    #[default]
    Service,
    Machinery,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Ladder => "ladder",
            VehicleType::Tanker => "tanker",
            VehicleType::Snorkel => "snorkel",
            VehicleType::Terrain => "terrain",
            VehicleType::Rescue => "rescue",
            VehicleType::Service => "service",
            VehicleType::Machinery => "machinery",
        }
    }

    pub fn label_tr(&self) -> &'static str {
        match self {
            VehicleType::Ladder => "Merdiven",
            VehicleType::Tanker => "Tanker",
            VehicleType::Snorkel => "Şnorkel",
            VehicleType::Terrain => "Arazöz",
            VehicleType::Rescue => "Kurtarma",
            VehicleType::Service => "Hizmet",
            VehicleType::Machinery => "İş Makinası",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Driver,
    Manager,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Driver => "driver",
            UserRole::Manager => "manager",
        }
    }

    pub fn label_tr(&self) -> &'static str {
        match self {
            UserRole::Driver => "Şoför",
            UserRole::Manager => "Amir",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum FaultStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
}

impl FaultStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultStatus::Pending => "pending",
            FaultStatus::InProgress => "in_progress",
            FaultStatus::Resolved => "resolved",
        }
    }

    pub fn label_tr(&self) -> &'static str {
        match self {
            FaultStatus::Pending => "Bekliyor",
            FaultStatus::InProgress => "İşlemde",
            FaultStatus::Resolved => "Çözüldü",
        }
    }
}

macro_rules! api_enum_traits {
    ($ty:ty, $what:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                serde_json::from_value(serde_json::Value::String(wanted))
                    .map_err(|_| format!("unknown {} '{}'", $what, s))
            }
        }
    };
}

api_enum_traits!(VehicleStatus, "vehicle status");
api_enum_traits!(VehicleType, "vehicle type");
api_enum_traits!(UserRole, "user role");
api_enum_traits!(FaultStatus, "fault status");

/// A fleet vehicle as served by `GET /api/vehicles`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vehicle {
    pub id: String,
    pub plate: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub vehicle_type: VehicleType,
    #[serde(default)]
    pub status: VehicleStatus,
    #[serde(default)]
    pub station_id: String,

    /// Odometer reading in kilometres
    #[serde(default, with = "km::or_zero")]
    pub current_km: u64,

    #[serde(default, with = "crate::dates::optional")]
    pub insurance_expiry: Option<NaiveDate>,
    #[serde(default, with = "crate::dates::optional")]
    pub inspection_expiry: Option<NaiveDate>,
    /// Comprehensive (collision) insurance
    #[serde(default, with = "crate::dates::optional")]
    pub kasko_expiry: Option<NaiveDate>,

    #[serde(default, with = "crate::dates::optional")]
    pub last_oil_change_date: Option<NaiveDate>,
    #[serde(default, with = "km::optional")]
    pub last_oil_change_km: Option<u64>,
    #[serde(default, with = "crate::dates::optional")]
    pub next_oil_change_date: Option<NaiveDate>,
    #[serde(default, with = "km::optional")]
    pub next_oil_change_km: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_driver_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Vehicle {
    /// A vehicle with only the identifying fields set
    pub fn new(id: impl Into<String>, plate: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            plate: plate.into(),
            brand: String::new(),
            model: String::new(),
            year: 0,
            vehicle_type: VehicleType::default(),
            status: VehicleStatus::default(),
            station_id: String::new(),
            current_km: 0,
            insurance_expiry: None,
            inspection_expiry: None,
            kasko_expiry: None,
            last_oil_change_date: None,
            last_oil_change_km: None,
            next_oil_change_date: None,
            next_oil_change_km: None,
            assigned_driver_id: None,
            notes: None,
        }
    }

    pub fn display_name(&self) -> String {
        let make = format!("{} {}", self.brand, self.model);
        let make = make.trim();
        if make.is_empty() {
            self.plate.clone()
        } else {
            format!("{} ({})", self.plate, make)
        }
    }

    /// Kilometres left until the scheduled oil change, negative once exceeded.
    ///
    /// A scheduled mileage of 0 is how blank forms are stored and counts as unset.
    pub fn oil_change_km_remaining(&self) -> Option<i64> {
        self.next_oil_change_km
            .filter(|km| *km > 0)
            .map(|km| km as i64 - self.current_km as i64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Station {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
}

/// A console user; the API never returns password hashes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
}

impl User {
    pub fn is_driver(&self) -> bool {
        self.role == UserRole::Driver
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Fault {
    pub id: String,
    pub vehicle_id: String,
    #[serde(default)]
    pub reported_by: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: FaultStatus,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Fault {
    pub fn is_pending(&self) -> bool {
        self.status == FaultStatus::Pending
    }
}

/// A saved API session; the backend issues tokens valid for 24 hours
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: String,
    pub base_url: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn expires_in_minutes(&self) -> i64 {
        (self.expires_at - Utc::now()).num_minutes().max(0)
    }

    /// Format expiration time as human-readable string
    pub fn expiration_display(&self) -> String {
        let mins = self.expires_in_minutes();

        if mins >= 60 {
            let hours = mins / 60;
            let remaining_mins = mins % 60;
            if remaining_mins > 0 {
                format!("{}h {}m", hours, remaining_mins)
            } else {
                format!("{}h", hours)
            }
        } else if mins > 0 {
            format!("{} minutes", mins)
        } else {
            "EXPIRED".to_string()
        }
    }
}

fn default_priority() -> String {
    "normal".to_string()
}

/// serde adapters for odometer fields.
///
/// Form inputs store mileage as raw strings (`"54000"`, `""`), so numbers,
/// numeric strings, blanks and null are all accepted. Blank and null are unset.
mod km {
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawKm {
        Whole(u64),
        Fractional(f64),
        Text(String),
    }

    fn from_float<E: de::Error>(value: f64) -> Result<u64, E> {
        if value.is_finite() && value >= 0.0 {
            Ok(value.trunc() as u64)
        } else {
            Err(E::custom(format!("invalid kilometre value {}", value)))
        }
    }

    fn parse<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawKm>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawKm::Whole(km)) => Ok(Some(km)),
            Some(RawKm::Fractional(km)) => from_float(km).map(Some),
            Some(RawKm::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(None);
                }
                if let Ok(km) = text.parse::<u64>() {
                    return Ok(Some(km));
                }
                match text.parse::<f64>() {
                    Ok(km) => from_float(km).map(Some),
                    Err(_) => Err(de::Error::custom(format!(
                        "invalid kilometre value '{}'",
                        text
                    ))),
                }
            }
        }
    }

    pub mod optional {
        use serde::{Deserializer, Serialize, Serializer};

        pub fn serialize<S>(km: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            km.serialize(serializer)
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
        where
            D: Deserializer<'de>,
        {
            super::parse(deserializer)
        }
    }

    /// Unset readings become 0
    pub mod or_zero {
        use serde::{Deserializer, Serializer};

        pub fn serialize<S>(km: &u64, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_u64(*km)
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
        where
            D: Deserializer<'de>,
        {
            Ok(super::parse(deserializer)?.unwrap_or(0))
        }
    }
}
