use thiserror::Error;

pub type Result<T> = std::result::Result<T, BaselineError>;

#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error (status {status}): {message}")]
    Http { status: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for BaselineError {
    fn from(err: reqwest::Error) -> Self {
        BaselineError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for BaselineError {
    fn from(err: serde_json::Error) -> Self {
        BaselineError::Parse(err.to_string())
    }
}
