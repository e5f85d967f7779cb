use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One row as exported by the ADT table, before normalization.
///
/// Numeric cells that are empty or not numbers deserialize to `None`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawObservation {
    #[serde(rename = "STREETONE")]
    pub street: String,
    #[serde(rename = "LATITUDE", deserialize_with = "csv::invalid_option")]
    pub latitude: Option<f64>,
    #[serde(rename = "LONGITUDE", deserialize_with = "csv::invalid_option")]
    pub longitude: Option<f64>,
    #[serde(rename = "ADT", deserialize_with = "csv::invalid_option")]
    pub adt: Option<f64>,
    #[serde(rename = "COUNTDATE")]
    pub count_date: String,
    #[serde(rename = "CITY", default)]
    pub city: String,
}

/// A normalized traffic observation for one road segment on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub street: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub adt: Option<f64>,
    pub count_date: NaiveDate,
    pub city: String,
}

impl Observation {
    pub fn new(street: &str, count_date: NaiveDate, adt: f64) -> Self {
        Observation {
            street: street.to_string(),
            latitude: None,
            longitude: None,
            adt: Some(adt),
            count_date,
            city: String::new(),
        }
    }

    /// Set the segment location.
    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn in_city(mut self, city: &str) -> Self {
        self.city = city.to_string();
        self
    }

    /// ADT value if present and finite.
    pub fn valid_adt(&self) -> Option<f64> {
        self.adt.filter(|v| v.is_finite())
    }

    /// `(latitude, longitude)` if both are present, finite and on the globe.
    pub fn location(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.filter(|v| v.is_finite() && (-90.0..=90.0).contains(v))?;
        let lon = self
            .longitude
            .filter(|v| v.is_finite() && (-180.0..=180.0).contains(v))?;
        Some((lat, lon))
    }
}

/// Timestamp layouts carrying a UTC offset. `%#z` also accepts `Z`.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f %#z",
    "%Y/%m/%d %H:%M:%S%.f%#z",
    "%Y/%m/%d %H:%M:%S%.f %#z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parses a count date and drops any timezone information.
///
/// Offsets are discarded without converting to UTC: the local wall-clock
/// date is kept, so `2019-12-31T23:30:00-08:00` normalizes to 2019-12-31.
/// A trailing `UTC` zone name is dropped the same way.
pub fn parse_count_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let value = value.strip_suffix("UTC").map(str::trim_end).unwrap_or(value);
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local().date());
    }

    OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.naive_local().date())
        .or_else(|| {
            NAIVE_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        })
}
