//! Groups derived daily metrics into month and year buckets and assembles the
//! final [`SolarResult`].

use crate::metrics::error::ProcessingError;
use crate::types::lat_lon::{Coordinates, LatLon};
use crate::types::solar_result::{
    BucketSummary, DateRange, DerivedDailyMetric, SolarResult, UNKNOWN_DATE,
};
use crate::utils::round1;
use chrono::{Datelike, NaiveDate};
use polars::df;
use polars::prelude::*;

pub const RECENT_DAYS: usize = 30;
pub const RECENT_MONTHS: u32 = 3;

/// Sorts `metrics` newest-first and builds the daily window plus monthly and yearly
/// means.
///
/// Monthly and yearly buckets are computed over all of `metrics`, not only the
/// [`RECENT_DAYS`] kept in `daily`.
///
/// `date_range.start` is the newest date in `daily` and `date_range.end` the oldest.
/// Clients of the JSON API depend on this ordering.
pub fn aggregate(
    location: LatLon,
    mut metrics: Vec<DerivedDailyMetric>,
    today: NaiveDate,
) -> Result<SolarResult, ProcessingError> {
    metrics.sort_by(|a, b| b.date.cmp(&a.date));

    let (monthly, yearly) = if metrics.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        let frame = metrics_frame(&metrics)?;
        (monthly_summaries(frame.clone())?, yearly_summaries(frame)?)
    };

    let mut daily = metrics;
    daily.truncate(RECENT_DAYS);

    let (start, end) = match (daily.first(), daily.last()) {
        (Some(newest), Some(oldest)) => (newest.date.to_string(), oldest.date.to_string()),
        _ => (UNKNOWN_DATE.to_string(), UNKNOWN_DATE.to_string()),
    };

    Ok(SolarResult {
        coordinates: Coordinates::from(location),
        daily,
        monthly,
        yearly,
        date_range: DateRange {
            start,
            end,
            current_date: today.format("%Y-%m-%d").to_string(),
        },
    })
}

fn metrics_frame(metrics: &[DerivedDailyMetric]) -> Result<LazyFrame, ProcessingError> {
    let months: Vec<String> = metrics
        .iter()
        .map(|m| m.date.format("%Y-%m").to_string())
        .collect();
    let month_labels: Vec<String> = metrics
        .iter()
        .map(|m| m.date.format("%b %Y").to_string())
        .collect();
    let years: Vec<i32> = metrics.iter().map(|m| m.date.year()).collect();
    let sunlight_hours: Vec<f64> = metrics.iter().map(|m| m.sunlight_hours).collect();
    let ghi: Vec<f64> = metrics.iter().map(|m| m.ghi).collect();
    let pvout: Vec<f64> = metrics.iter().map(|m| m.pvout).collect();

    let df = df!(
        "month" => months,
        "month_label" => month_labels,
        "year" => years,
        "sunlight_hours" => sunlight_hours,
        "ghi" => ghi,
        "pvout" => pvout
    )?;
    Ok(df.lazy())
}

fn bucket_means() -> [Expr; 3] {
    [
        col("sunlight_hours").mean(),
        col("ghi").mean(),
        col("pvout").mean(),
    ]
}

fn newest_first() -> SortMultipleOptions {
    SortMultipleOptions::default().with_order_descending(true)
}

fn monthly_summaries(frame: LazyFrame) -> Result<Vec<BucketSummary>, ProcessingError> {
    let df = frame
        .group_by([col("month"), col("month_label")])
        .agg(bucket_means())
        .sort_by_exprs([col("month")], newest_first())
        .limit(RECENT_MONTHS)
        .collect()?;

    let labels = df.column("month_label")?.str()?;
    let mut summaries = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let label = labels
            .get(i)
            .ok_or_else(|| ProcessingError::UnexpectedNull("month_label".to_string()))?;
        summaries.push(bucket_summary(&df, i, label.to_string())?);
    }
    Ok(summaries)
}

fn yearly_summaries(frame: LazyFrame) -> Result<Vec<BucketSummary>, ProcessingError> {
    let df = frame
        .group_by([col("year")])
        .agg(bucket_means())
        .sort_by_exprs([col("year")], newest_first())
        .collect()?;

    let years = df.column("year")?.i32()?;
    let mut summaries = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let year = years
            .get(i)
            .ok_or_else(|| ProcessingError::UnexpectedNull("year".to_string()))?;
        summaries.push(bucket_summary(&df, i, year.to_string())?);
    }
    Ok(summaries)
}

fn bucket_summary(
    df: &DataFrame,
    row: usize,
    label: String,
) -> Result<BucketSummary, ProcessingError> {
    let mean_at = |name: &str| -> Result<f64, ProcessingError> {
        df.column(name)?
            .f64()?
            .get(row)
            .map(round1)
            .ok_or_else(|| ProcessingError::UnexpectedNull(name.to_string()))
    };
    Ok(BucketSummary {
        label,
        sunlight_hours: mean_at("sunlight_hours")?,
        ghi: mean_at("ghi")?,
        pvout: mean_at("pvout")?,
    })
}
