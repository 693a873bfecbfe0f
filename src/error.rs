use std::path::PathBuf;
use thiserror::Error;

/// Failures while ingesting a mentor catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate mentor id {0}")]
    DuplicateId(i64),

    #[error("Mentor id must be positive, got {0}")]
    InvalidId(i64),

    #[error("Mentor #{id} has rating {rating}, expected a value between 0 and 5")]
    RatingOutOfRange { id: i64, rating: f64 },
}

/// Reasons a booking cannot be confirmed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Select a time slot first")]
    MissingTimeSlot,

    #[error("Time slot '{0}' is not offered")]
    UnknownTimeSlot(String),

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("Write your question before sending")]
    MissingQuestion,

    #[error("{0} does not take a {1}")]
    NotApplicable(&'static str, &'static str),
}
