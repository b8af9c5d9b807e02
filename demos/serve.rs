//! Serves the solar JSON API on 127.0.0.1:5001.
//! Set RUST_LOG=info (or debug) to see request and cache logging.

use solar_duration::http::{router, HttpState};
use solar_duration::SolarDuration;
use std::error::Error;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let client = SolarDuration::new().await?;
    let app = router(HttpState {
        client: Arc::new(client),
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:5001").await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
