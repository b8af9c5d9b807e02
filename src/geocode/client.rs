use crate::geocode::error::GeocodeError;
use crate::types::geocode_result::GeocodeResult;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    admin1: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
}

impl From<SearchHit> for GeocodeResult {
    fn from(hit: SearchHit) -> Self {
        GeocodeResult::new(
            hit.name.unwrap_or_default(),
            hit.admin1.unwrap_or_default(),
            hit.country.unwrap_or_default(),
            hit.latitude,
            hit.longitude,
        )
    }
}

/// Place-name search against the Open-Meteo geocoding API.
pub struct GeocodeClient {
    client: Client,
    base_url: String,
    timeout: Duration,
    language: String,
}

impl GeocodeClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        language: impl Into<String>,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GeocodeError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
            language: language.into(),
        })
    }

    /// Returns up to `count` places matching `query`.
    pub async fn search(&self, query: &str, count: u32) -> Result<Vec<GeocodeResult>, GeocodeError> {
        let url = &self.base_url;
        let params = [
            ("name", query.to_string()),
            ("count", count.to_string()),
            ("language", self.language.clone()),
        ];
        debug!("Geocoding request {} with {:?}", url, params);

        let response = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    GeocodeError::HttpStatus {
                        url: url.clone(),
                        status,
                        source: e,
                    }
                } else {
                    GeocodeError::NetworkRequest(url.clone(), e)
                });
            }
        };

        let body = response.text().await.map_err(|e| self.request_error(e))?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Malformed {
                url: url.clone(),
                source: e,
            })?;

        let results: Vec<GeocodeResult> =
            parsed.results.into_iter().map(GeocodeResult::from).collect();
        info!("Geocoding '{}' returned {} results", query, results.len());
        Ok(results)
    }

    fn request_error(&self, e: reqwest::Error) -> GeocodeError {
        if e.is_timeout() {
            GeocodeError::Timeout {
                url: self.base_url.clone(),
                timeout: self.timeout,
                source: e,
            }
        } else {
            GeocodeError::NetworkRequest(self.base_url.clone(), e)
        }
    }
}
