//! Error types and the store-error status policy

use axum::http::StatusCode;
use gcs_proxy_store::StoreError;
use thiserror::Error;

/// Gateway error type
///
/// Request handling never surfaces these; they cover startup and
/// configuration failures that stop the process.
#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// HTTP status reported when a primary or fallback lookup fails.
///
/// Every store failure is reported as 404, whether the object is absent or
/// the backend failed (permissions, network, malformed replies). Clients
/// cannot tell those apart.
pub fn lookup_failure_status(_err: &StoreError) -> StatusCode {
    StatusCode::NOT_FOUND
}

/// HTTP status reported when an opened object fails before its first byte
pub fn stream_failure_status(_err: &StoreError) -> StatusCode {
    StatusCode::BAD_GATEWAY
}
