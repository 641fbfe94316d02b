use crate::models::WeatherVariable;

#[derive(Debug, thiserror::Error)]
pub enum AlmanacError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "No {variable} data collected for the last 5 years. Unable to calculate five-year averages."
    )]
    NoData { variable: WeatherVariable },
}

/// Why a single archive request did not yield a sample.
///
/// The aggregator treats every variant as "skip this point"; none of them is
/// coerced into a default value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchFailure {
    #[error("{0} is not a valid date on or before today")]
    InvalidDate(String),

    #[error("transient failure: {0}")]
    Transient(String),

    #[error("request rejected with HTTP status {status}")]
    Rejected { status: u16 },

    #[error("unexpected data format: {0}")]
    Malformed(String),

    #[error("no cached response for {0} and offline mode is enabled")]
    Offline(String),
}

pub type Result<T> = std::result::Result<T, AlmanacError>;
