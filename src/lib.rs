//! Read-only HTTP gateway for Google Cloud Storage.
//!
//! Facade over the workspace crates: [`cli`] holds the gateway and server,
//! [`store`] the object store backends.

pub use gcs_proxy_cli as cli;
pub use gcs_proxy_store as store;
