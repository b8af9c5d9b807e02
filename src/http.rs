//! JSON API over a shared [`SolarDuration`] client.
//!
//! * `GET /api/solar-data?lat=..&lng=..` returns a [`crate::SolarResult`].
//! * `GET /api/geocode?query=..` returns `{"results": [...]}`.
//!
//! Failures are reported as `{"error": "..."}` with status 400 for bad input and
//! 500 for everything else.

use crate::error::SolarError;
use crate::types::geocode_result::GeocodeResult;
use crate::types::lat_lon::LatLon;
use crate::types::solar_result::SolarResult;
use crate::SolarDuration;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct HttpState {
    pub client: Arc<SolarDuration>,
}

#[derive(Debug, Deserialize)]
struct SolarDataParams {
    lat: Option<String>,
    lng: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeParams {
    query: Option<String>,
}

#[derive(Debug, Serialize)]
struct GeocodeResponse {
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Bad input keeps its own message; anything else is prefixed with `context`.
    fn from_solar(err: SolarError, context: &str) -> Self {
        if err.is_invalid_input() {
            return Self::bad_request(err.to_string());
        }
        error!("{}: {:?}", context, err);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{context}: {err}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

fn parse_coordinate(value: Option<&str>, name: &str) -> Result<f64, ApiError> {
    let value = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request("Latitude and longitude are required"))?;
    value
        .parse::<f64>()
        .map_err(|_| ApiError::bad_request(format!("Invalid {name}: '{value}'")))
}

async fn solar_data(
    State(state): State<HttpState>,
    Query(params): Query<SolarDataParams>,
) -> Result<Json<SolarResult>, ApiError> {
    let lat = parse_coordinate(params.lat.as_deref(), "latitude")?;
    let lng = parse_coordinate(params.lng.as_deref(), "longitude")?;
    info!("Solar data requested for ({}, {})", lat, lng);

    let result = state
        .client
        .solar_data()
        .location(LatLon(lat, lng))
        .call()
        .await
        .map_err(|e| ApiError::from_solar(e, "Failed to retrieve solar data"))?;
    Ok(Json(result))
}

async fn geocode(
    State(state): State<HttpState>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<GeocodeResponse>, ApiError> {
    let query = params.query.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(ApiError::bad_request("Search query is required"));
    }

    let results = state
        .client
        .geocode()
        .query(&query)
        .call()
        .await
        .map_err(|e| ApiError::from_solar(e, "Failed to search for location"))?;
    Ok(Json(GeocodeResponse { results }))
}

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/api/solar-data", get(solar_data))
        .route("/api/geocode", get(geocode))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
