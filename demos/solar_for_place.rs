//! Looks up a place by name and prints its solar summary.
//!
//! cargo run --example solar_for_place -- "Chiang Mai"

use solar_duration::{LatLon, SolarDuration, SolarError};
use std::env;

#[tokio::main]
async fn main() -> Result<(), SolarError> {
    env_logger::init();

    let query = env::args().nth(1).unwrap_or_else(|| "Bangkok".to_string());
    let client = SolarDuration::new().await?;

    let places = client.geocode().query(&query).count(1).call().await?;
    let Some(place) = places.first() else {
        println!("No place found for '{}'", query);
        return Ok(());
    };
    let (Some(lat), Some(lng)) = (place.lat, place.lng) else {
        println!("'{}' has no coordinates", place.display_name);
        return Ok(());
    };

    let result = client.solar_data().location(LatLon(lat, lng)).call().await?;

    println!("{} ({:.4}, {:.4})", place.display_name, lat, lng);
    println!(
        "Days {} to {} (as of {})",
        result.date_range.end, result.date_range.start, result.date_range.current_date
    );
    println!("{:<10} {:>8} {:>6} {:>6}", "Period", "Sun h", "GHI", "PVOUT");
    for bucket in result.monthly.iter().chain(result.yearly.iter()) {
        println!(
            "{:<10} {:>8.1} {:>6.1} {:>6.1}",
            bucket.label, bucket.sunlight_hours, bucket.ghi, bucket.pvout
        );
    }
    Ok(())
}
