//! Gateway configuration

use gcs_proxy_store::gcs::DEFAULT_GCS_ENDPOINT;
use serde::{Deserialize, Serialize};

/// Key resolution and missing-object policy.
///
/// Built once at startup and shared read-only by every request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Prepended to every resolved key (e.g. "site/")
    pub key_prefix: String,
    /// Object served for an empty request path; empty disables
    pub index_name: String,
    /// Object served when the requested one does not exist; empty disables
    pub fallback_name: String,
    /// Report a served fallback object with 200 instead of 404
    pub suppress_not_found: bool,
}

impl ProxyConfig {
    /// Whether a fallback object is configured
    pub fn fallback_enabled(&self) -> bool {
        !self.fallback_name.is_empty()
    }
}

/// Gateway server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Bucket to serve objects from
    pub bucket: String,
    /// GCS JSON API endpoint
    pub gcs_endpoint: String,
    /// Bearer token for the storage API
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    /// Use in-memory storage (for testing/development)
    pub use_memory_store: bool,
    /// Log every object under the prefix before serving
    pub list_objects_on_start: bool,
    /// Key resolution policy
    pub proxy: ProxyConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            bucket: String::new(),
            gcs_endpoint: DEFAULT_GCS_ENDPOINT.to_string(),
            access_token: None,
            use_memory_store: false,
            list_objects_on_start: false,
            proxy: ProxyConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Get the bind address
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
