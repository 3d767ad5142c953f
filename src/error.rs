use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    /// The work-order export could not be fetched or read.
    #[error("source unavailable: {source_name}: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    #[error("required column `{0}` missing from source header")]
    MissingColumn(String),

    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    #[error("http client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
