//! Local stand-ins for the Open-Meteo endpoints.

use axum::http::{header, StatusCode, Uri};
use axum::Router;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub(crate) struct MockUpstream {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    last_query: Arc<Mutex<Option<String>>>,
}

impl MockUpstream {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<String> {
        self.last_query.lock().unwrap().clone()
    }
}

/// Serves `body` with `status` for every path, after an optional delay.
pub(crate) async fn spawn_mock(
    status: StatusCode,
    body: impl Into<String>,
    delay: Option<Duration>,
) -> MockUpstream {
    let body = body.into();
    let hits = Arc::new(AtomicUsize::new(0));
    let last_query = Arc::new(Mutex::new(None));

    let handler_hits = hits.clone();
    let handler_query = last_query.clone();
    let app = Router::new().fallback(move |uri: Uri| {
        let hits = handler_hits.clone();
        let last_query = handler_query.clone();
        let body = body.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            *last_query.lock().unwrap() = uri.query().map(str::to_string);
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            (status, [(header::CONTENT_TYPE, "application/json")], body)
        }
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream");
    let addr = listener.local_addr().expect("mock upstream address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream {
        base_url: format!("http://{addr}/v1/archive"),
        hits,
        last_query,
    }
}

/// An archive response body with the three-day sample used across tests:
/// radiation 20/22/18 MJ, temperatures 32/24, 33/25, 30/23, no sunshine data.
pub(crate) fn three_day_archive_body() -> Value {
    json!({
        "latitude": 13.75,
        "longitude": 100.5,
        "timezone": "Asia/Bangkok",
        "daily": {
            "time": ["2024-03-01", "2024-03-02", "2024-03-03"],
            "temperature_2m_max": [32.0, 33.0, 30.0],
            "temperature_2m_min": [24.0, 25.0, 23.0],
            "sunrise": ["2024-03-01T06:35", "2024-03-02T06:35", "2024-03-03T06:34"],
            "sunset": ["2024-03-01T18:24", "2024-03-02T18:24", "2024-03-03T18:24"],
            "sunshine_duration": [null, null, null],
            "shortwave_radiation_sum": [20.0, 22.0, 18.0]
        }
    })
}
