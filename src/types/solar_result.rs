use crate::types::lat_lon::Coordinates;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder used for `date_range.start` / `date_range.end` when no daily data exists.
pub const UNKNOWN_DATE: &str = "unknown";

/// One day of upstream weather data, as needed for the solar model.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDailyRecord {
    pub date: NaiveDate,
    pub sunshine_duration_seconds: Option<f64>,
    pub shortwave_radiation_mj: f64,
    pub temperature_max: f64,
    pub temperature_min: f64,
}

/// Solar metrics derived from one [`RawDailyRecord`], rounded to one decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedDailyMetric {
    pub date: NaiveDate,
    /// Hours of sunshine.
    #[serde(rename = "sunlightHours")]
    pub sunlight_hours: f64,
    /// Global horizontal irradiance, kWh/m².
    pub ghi: f64,
    /// PV yield, kWh/kWp/day.
    pub pvout: f64,
}

/// Mean metrics over a month or a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketSummary {
    /// `"Jan 2024"` for months, `"2024"` for years.
    #[serde(rename = "date")]
    pub label: String,
    #[serde(rename = "sunlightHours")]
    pub sunlight_hours: f64,
    pub ghi: f64,
    pub pvout: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    /// Most recent date in `daily`.
    pub start: String,
    /// Oldest date in `daily`.
    pub end: String,
    pub current_date: String,
}

/// The artifact returned for a coordinate and stored in the cache.
///
/// `daily`, `monthly` and `yearly` are ordered newest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarResult {
    pub coordinates: Coordinates,
    pub daily: Vec<DerivedDailyMetric>,
    pub monthly: Vec<BucketSummary>,
    pub yearly: Vec<BucketSummary>,
    pub date_range: DateRange,
}
