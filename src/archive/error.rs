use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to build HTTP client for the weather archive")]
    ClientBuild(#[source] reqwest::Error),

    // Transport failures, non-success statuses and bodies without a "daily" section.
    #[error("Weather archive unavailable at {url}: {reason}")]
    UpstreamUnavailable {
        url: String,
        reason: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Weather archive at {url} did not respond within {timeout:?}")]
    UpstreamTimeout {
        url: String,
        timeout: Duration,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse weather archive response from {url}")]
    UpstreamMalformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
