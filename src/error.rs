// Error types for the cachepeek application.
// Covers fetch errors, config errors, and general application errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CachepeekError {
    #[error("HTTP error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("request to {url} failed with status {status}")]
    Fetch { url: String, status: u16 },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CachepeekError>;
