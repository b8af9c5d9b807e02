use serde::{Deserialize, Serialize};

/// A place returned by the geocoding search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub name: String,
    /// Province or state.
    pub admin1: String,
    pub country: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub display_name: String,
}

impl GeocodeResult {
    pub fn new(
        name: String,
        admin1: String,
        country: String,
        lat: Option<f64>,
        lng: Option<f64>,
    ) -> Self {
        let display_name = display_name(&name, &admin1, &country);
        Self {
            name,
            admin1,
            country,
            lat,
            lng,
            display_name,
        }
    }
}

/// `"name, admin1, country"` with empty parts collapsed.
fn display_name(name: &str, admin1: &str, country: &str) -> String {
    format!("{name}, {admin1}, {country}")
        .replace(", ,", ",")
        .trim_matches(|c| c == ',' || c == ' ')
        .to_string()
}
