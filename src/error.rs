use crate::archive::error::ArchiveError;
use crate::geocode::error::GeocodeError;
use crate::metrics::error::ProcessingError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SolarError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Upstream(#[from] ArchiveError),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Processing(#[from] ProcessingError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),
}

impl SolarError {
    /// True for errors caused by the caller's input rather than by this service
    /// or its upstreams.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, SolarError::InvalidInput(_))
    }
}
