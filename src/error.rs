//! Error types for the KPI ingestion pipeline and the dashboard shell.
//!
//! - [`SourceError`] - failures of the spreadsheet export collaborator
//! - [`KpiError`] - everything a caller of the library can see
//!
//! Malformed rows and non-numeric cells are not errors: the loader drops or
//! coerces them.

use thiserror::Error;

/// Errors raised while retrieving the CSV export.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport failure: DNS, connect, TLS, timeout.
    #[error("request failed: {0}")]
    Request(String),

    /// The export endpoint answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The body could not be read as text.
    #[error("unreadable response body: {0}")]
    Body(String),
}

#[derive(Debug, Error)]
pub enum KpiError {
    /// The URL carries no recognizable spreadsheet identifier.
    #[error("not a valid spreadsheet URL: {0}")]
    Resolution(String),

    /// The export could not be fetched or read. The previous snapshot stays in place.
    #[error("spreadsheet unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KpiError>;
