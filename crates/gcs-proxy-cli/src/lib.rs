//! # GCS Proxy
//!
//! Read-only HTTP gateway in front of a Google Cloud Storage bucket.
//!
//! This crate provides:
//! - **Key resolution**: Request paths become object keys under a prefix, with an index object for `/`
//! - **Missing objects**: Optional fallback object, served as 404 or as 200
//! - **Streaming**: Object bytes are streamed straight from the store to the client
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   HTTP Clients                      │
//! │            (browsers, curl, CDNs, etc.)             │
//! └─────────────────────────┬───────────────────────────┘
//!                           │  GET / HEAD
//! ┌─────────────────────────▼───────────────────────────┐
//! │                      GCS Proxy                      │
//! ├─────────────────────────────────────────────────────┤
//! │        Request ID │ Access Log │ Trace Layer        │
//! ├─────────────────────────────────────────────────────┤
//! │   Key Resolver  →  Object Handler (fallback policy) │
//! ├─────────────────────────────────────────────────────┤
//! │                   gcs-proxy-store                   │
//! │          (GCS JSON API, in-memory store)            │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod resolver;
pub mod routes;
pub mod server;
pub mod state;

pub use config::{GatewayConfig, ProxyConfig};
pub use error::ProxyError;
pub use resolver::resolve_key;
pub use server::{run_server, run_server_with_shutdown, serve};
pub use state::AppState;
