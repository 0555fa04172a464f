//! Error types for the gcs-proxy-store crate

use thiserror::Error;

/// Result type alias using `StoreError`
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during object store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Object does not exist
    #[error("object not found: {0}")]
    NotFound(String),

    /// Backend answered with an unexpected status
    #[error("unexpected status {status} for {key}: {message}")]
    Status {
        key: String,
        status: u16,
        message: String,
    },

    /// Connection error
    #[error("connection error: {0}")]
    Connection(String),

    /// Request or connection attempt timed out
    #[error("timed out: {0}")]
    Timeout(String),

    /// HTTP error
    #[error("http error: {0}")]
    Http(String),

    /// Deserialization error
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Failure while reading object bytes after the object was opened
    #[error("stream error: {0}")]
    Stream(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl StoreError {
    /// Whether the backend reported the object as absent.
    ///
    /// Only this case is eligible for fallback substitution.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            StoreError::Timeout(err.to_string())
        } else if err.is_connect() {
            StoreError::Connection(err.to_string())
        } else if err.is_decode() {
            StoreError::Deserialization(err.to_string())
        } else {
            StoreError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Deserialization(err.to_string())
    }
}
