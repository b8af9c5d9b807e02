//! Per-day solar model: unit conversion, sunshine fallback and temperature derating.

use crate::archive::fetcher::ArchiveDaily;
use crate::metrics::error::ProcessingError;
use crate::types::solar_result::{DerivedDailyMetric, RawDailyRecord};
use crate::utils::round1;
use chrono::NaiveDate;

/// MJ/m² to kWh/m².
pub const MJ_TO_KWH: f64 = 0.2778;
/// Daylight hours assumed for a clear day when sunshine duration is missing.
pub const MAX_DAYLIGHT_HOURS: f64 = 12.5;
/// Shortwave radiation of a typical clear day, MJ/m².
pub const CLEAR_SKY_RADIATION_MJ: f64 = 25.0;
/// Panel efficiency. Part of the model description, not applied to PVOUT.
pub const SYSTEM_EFFICIENCY: f64 = 0.20;
pub const PERFORMANCE_RATIO: f64 = 0.80;
/// Output loss per °C above [`REFERENCE_TEMPERATURE_C`].
pub const TEMP_LOSS_PER_DEGREE: f64 = 0.004;
pub const REFERENCE_TEMPERATURE_C: f64 = 25.0;

/// Builds one record per index of the archive columns, skipping indices where
/// radiation or either temperature is missing.
///
/// A non-empty sunshine column shorter than `time` also causes the trailing
/// indices to be skipped; an entirely absent sunshine column does not.
pub fn records_from_archive(daily: &ArchiveDaily) -> Result<Vec<RawDailyRecord>, ProcessingError> {
    let value_at = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();
    let has_sunshine = !daily.sunshine_duration.is_empty();

    let mut records = Vec::with_capacity(daily.time.len());
    for (i, date) in daily.time.iter().enumerate() {
        let (Some(radiation), Some(t_max), Some(t_min)) = (
            value_at(&daily.shortwave_radiation_sum, i),
            value_at(&daily.temperature_2m_max, i),
            value_at(&daily.temperature_2m_min, i),
        ) else {
            continue;
        };
        if has_sunshine && i >= daily.sunshine_duration.len() {
            continue;
        }

        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| ProcessingError::InvalidDate(date.clone(), e))?;
        records.push(RawDailyRecord {
            date,
            sunshine_duration_seconds: value_at(&daily.sunshine_duration, i),
            shortwave_radiation_mj: radiation,
            temperature_max: t_max,
            temperature_min: t_min,
        });
    }
    Ok(records)
}

/// `1 - max(0, (avg - 25) * 0.004)`. Never above 1, unbounded below.
pub fn temperature_factor(temperature_max: f64, temperature_min: f64) -> f64 {
    let avg_temp = (temperature_max + temperature_min) / 2.0;
    1.0 - ((avg_temp - REFERENCE_TEMPERATURE_C) * TEMP_LOSS_PER_DEGREE).max(0.0)
}

pub fn sunlight_hours(record: &RawDailyRecord) -> f64 {
    match record.sunshine_duration_seconds {
        Some(seconds) => seconds / 3600.0,
        None if record.shortwave_radiation_mj != 0.0 => {
            MAX_DAYLIGHT_HOURS * (record.shortwave_radiation_mj / CLEAR_SKY_RADIATION_MJ)
        }
        None => 0.0,
    }
}

pub fn derive_daily_metric(record: &RawDailyRecord) -> DerivedDailyMetric {
    let ghi = record.shortwave_radiation_mj * MJ_TO_KWH;
    let temp_factor = temperature_factor(record.temperature_max, record.temperature_min);
    let pvout = ghi * PERFORMANCE_RATIO * temp_factor;

    DerivedDailyMetric {
        date: record.date,
        sunlight_hours: round1(sunlight_hours(record)),
        ghi: round1(ghi),
        pvout: round1(pvout),
    }
}

/// One metric per record, in input order.
pub fn derive_daily_metrics(records: &[RawDailyRecord]) -> Vec<DerivedDailyMetric> {
    records.iter().map(derive_daily_metric).collect()
}
