//! Error types for timetable-ingest

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    /// A period entry in none of the known wire shapes
    #[error("Malformed period entry: {0}")]
    MalformedEntry(String),

    #[error("Unknown day: {0}")]
    UnknownDay(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// `success: false` or a missing payload
    #[error("Request failed: {0}")]
    Unsuccessful(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
