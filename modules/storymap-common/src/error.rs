use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoryMapError>;

#[derive(Error, Debug)]
pub enum StoryMapError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No story id is left above {0}")]
    IdsExhausted(i64),

    #[error("Ingest error: {0}")]
    Ingest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Reasons a candidate story is rejected before anything is written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is not a number: {raw:?}")]
    NotANumber { field: &'static str, raw: String },

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("Latitude must be between -90 and 90 (got {0})")]
    LatitudeOutOfRange(f64),

    #[error("Longitude must be between -180 and 180 (got {0})")]
    LongitudeOutOfRange(f64),

    #[error("{0} is required")]
    MissingField(&'static str),
}
