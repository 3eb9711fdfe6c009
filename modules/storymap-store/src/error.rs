use storymap_common::StoryMapError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid key: {0:?}")]
    InvalidKey(String),
}

impl From<StoreError> for StoryMapError {
    fn from(err: StoreError) -> Self {
        StoryMapError::Storage(err.to_string())
    }
}
