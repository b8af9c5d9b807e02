use crate::archive::error::ArchiveError;
use crate::types::lat_lon::LatLon;
use chrono::{NaiveDate, TimeDelta};
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// Daily fields requested from the archive.
pub const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,sunrise,sunset,sunshine_duration,shortwave_radiation_sum";

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    daily: Option<ArchiveDaily>,
}

/// The "daily" section of an archive response: parallel, nullable columns aligned
/// with `time`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArchiveDaily {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub sunrise: Vec<Option<String>>,
    #[serde(default)]
    pub sunset: Vec<Option<String>>,
    /// Seconds.
    #[serde(default)]
    pub sunshine_duration: Vec<Option<f64>>,
    /// MJ/m².
    #[serde(default)]
    pub shortwave_radiation_sum: Vec<Option<f64>>,
}

/// Start and end date for a window of `days` days ending on `today`.
pub fn history_window(today: NaiveDate, days: u32) -> (NaiveDate, NaiveDate) {
    (today - TimeDelta::days(i64::from(days)), today)
}

pub struct ArchiveFetcher {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ArchiveFetcher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ArchiveError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ArchiveError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    /// Fetches daily records for `location` between `start` and `end` (inclusive).
    ///
    /// No retries are made; the first failure is returned.
    pub async fn fetch_daily(
        &self,
        location: LatLon,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ArchiveDaily, ArchiveError> {
        let url = &self.base_url;
        let query = [
            ("latitude", location.0.to_string()),
            ("longitude", location.1.to_string()),
            ("start_date", start.format("%Y-%m-%d").to_string()),
            ("end_date", end.format("%Y-%m-%d").to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ];
        info!(
            "Fetching archive data for {} from {} to {}",
            location, start, end
        );
        debug!("Archive request {} with {:?}", url, query);

        let response = self
            .client
            .get(url)
            .query(&query)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                let reason = match e.status() {
                    Some(status) => format!("HTTP status {status}"),
                    None => "HTTP error".to_string(),
                };
                return Err(ArchiveError::UpstreamUnavailable {
                    url: url.clone(),
                    reason,
                    source: Some(e),
                });
            }
        };

        let body = response.text().await.map_err(|e| self.request_error(e))?;
        let parsed: ArchiveResponse =
            serde_json::from_str(&body).map_err(|e| ArchiveError::UpstreamMalformed {
                url: url.clone(),
                source: e,
            })?;

        let Some(daily) = parsed.daily else {
            warn!("Archive response from {} has no 'daily' section", url);
            return Err(ArchiveError::UpstreamUnavailable {
                url: url.clone(),
                reason: "response has no 'daily' section".to_string(),
                source: None,
            });
        };

        if let (Some(first), Some(last)) = (daily.time.first(), daily.time.last()) {
            info!(
                "Retrieved {} days of archive data ({} to {})",
                daily.time.len(),
                first,
                last
            );
        }
        Ok(daily)
    }

    fn request_error(&self, e: reqwest::Error) -> ArchiveError {
        if e.is_timeout() {
            warn!("Archive request to {} timed out", self.base_url);
            ArchiveError::UpstreamTimeout {
                url: self.base_url.clone(),
                timeout: self.timeout,
                source: e,
            }
        } else {
            warn!("Archive request to {} failed: {}", self.base_url, e);
            ArchiveError::UpstreamUnavailable {
                url: self.base_url.clone(),
                reason: "request failed".to_string(),
                source: Some(e),
            }
        }
    }
}
