//! Error types for the deposit form.

use thiserror::Error;

/// Result type alias using the deposit form's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for deposit form operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP/network request failed, or the endpoint answered with a non-2xx status
    #[error("Request error: {0}")]
    Request(String),

    /// Response body did not have the expected shape
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
