// Lenient date parsing for API date fields
//
// The fleet API hands out dates in two shapes: plain `YYYY-MM-DD` values
// written by date inputs, and full timestamps written by the backend itself
// (`2025-03-01T09:30:00.123456+00:00`). Both reduce to a UTC calendar date.
use crate::error::{FleetError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an API date value. Blank strings are treated as absent.
pub fn parse_date(raw: &str) -> Result<Option<NaiveDate>> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(Some(date));
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(timestamp.with_timezone(&Utc).date_naive()));
    }

    // Naive timestamps (no offset) are taken as UTC
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Some(timestamp.date()));
    }

    Err(FleetError::InvalidDate(value.to_string()))
}

/// Parse a date that must be present, such as a `--date` argument
pub fn parse_required_date(raw: &str) -> Result<NaiveDate> {
    parse_date(raw)?.ok_or_else(|| FleetError::InvalidDate(raw.to_string()))
}

/// Today's calendar date in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// serde adapter for `Option<NaiveDate>` fields fed by the API
pub mod optional {
    use super::{parse_date, DATE_FORMAT};
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(value) => parse_date(&value).map_err(de::Error::custom),
        }
    }
}
