use crate::error::SolarError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use solar_duration::LatLon;
///
/// let bangkok = LatLon(13.7563, 100.5018);
/// assert_eq!(bangkok.0, 13.7563); // Latitude
/// assert_eq!(bangkok.1, 100.5018); // Longitude
/// assert!(bangkok.validate().is_ok());
/// assert!(LatLon(95.0, 0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(self) -> f64 {
        self.0
    }

    pub fn longitude(self) -> f64 {
        self.1
    }

    /// Checks that latitude is within [-90, 90] and longitude within [-180, 180].
    ///
    /// # Errors
    ///
    /// Returns [`SolarError::InvalidInput`] for out-of-range or non-finite values.
    pub fn validate(self) -> Result<Self, SolarError> {
        let LatLon(lat, lng) = self;
        // NaN fails both range checks.
        if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng) {
            Ok(self)
        } else {
            Err(SolarError::InvalidInput(
                "Invalid coord, Latitude must be between -90 and 90, longitude between -180 and 180."
                    .to_string(),
            ))
        }
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Coordinates as echoed back in a [`crate::SolarResult`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLon> for Coordinates {
    fn from(location: LatLon) -> Self {
        Coordinates {
            lat: location.0,
            lng: location.1,
        }
    }
}
