use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Invalid date '{0}' in archive data")]
    InvalidDate(String, #[source] chrono::ParseError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Unexpected null in aggregated column '{0}'")]
    UnexpectedNull(String),
}
