use thiserror::Error;

pub type Result<T> = std::result::Result<T, ShelfClientError>;

#[derive(Debug, Error)]
pub enum ShelfClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ShelfClientError {
    fn from(err: reqwest::Error) -> Self {
        ShelfClientError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ShelfClientError {
    fn from(err: serde_json::Error) -> Self {
        ShelfClientError::Parse(err.to_string())
    }
}
