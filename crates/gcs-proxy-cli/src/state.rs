//! Application state

use crate::config::GatewayConfig;
use crate::error::ProxyError;
use gcs_proxy_store::{GcsConfig, GcsObjectStore, MemoryObjectStore, ObjectStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Application state shared across handlers
pub struct AppState {
    /// Gateway configuration
    pub config: GatewayConfig,
    /// Object store backend
    pub store: Arc<dyn ObjectStore>,
}

impl AppState {
    /// Create application state, building the store named by the configuration
    pub fn new(config: GatewayConfig) -> Result<Self, ProxyError> {
        let store: Arc<dyn ObjectStore> = if config.use_memory_store {
            warn!("⚠️  Using in-memory storage - bucket contents are empty until seeded");
            Arc::new(MemoryObjectStore::new())
        } else {
            if config.bucket.is_empty() {
                return Err(ProxyError::Config(
                    "a bucket name is required (--bucket or GCS_BUCKET)".to_string(),
                ));
            }
            let mut gcs = GcsConfig::for_bucket(&config.bucket).with_endpoint(&config.gcs_endpoint);
            if let Some(ref token) = config.access_token {
                gcs = gcs.with_access_token(token);
            }
            Arc::new(GcsObjectStore::new(gcs)?)
        };

        info!(store = %store.describe(), "Object store ready");

        Ok(Self::with_store(config, store))
    }

    /// Create application state around an existing store
    pub fn with_store(config: GatewayConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_required() {
        let result = AppState::new(GatewayConfig::default());
        assert!(matches!(result, Err(ProxyError::Config(_))));
    }

    #[test]
    fn test_memory_store_needs_no_bucket() {
        let config = GatewayConfig {
            use_memory_store: true,
            ..Default::default()
        };
        let state = AppState::new(config).unwrap();
        assert!(state.store.describe().starts_with("memory"));
    }

    #[tokio::test]
    async fn test_gcs_store_built_for_bucket() {
        let config = GatewayConfig {
            bucket: "my-site".to_string(),
            ..Default::default()
        };
        let state = AppState::new(config).unwrap();
        assert_eq!(
            state.store.describe(),
            "gs://my-site via https://storage.googleapis.com"
        );
    }
}
