//! Server startup and lifecycle

use crate::error::ProxyError;
use crate::{AppState, GatewayConfig, routes};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Run the gateway server
pub async fn run_server(config: GatewayConfig) -> anyhow::Result<()> {
    run_server_with_shutdown(config, std::future::pending()).await
}

/// Run server with graceful shutdown
pub async fn run_server_with_shutdown(
    config: GatewayConfig,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config.clone())?);

    if config.list_objects_on_start {
        list_objects(&state).await?;
    }

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ProxyError::Bind { addr: addr.clone(), source })?;

    info!("🚀 GCS proxy listening on http://{}", listener.local_addr()?);

    serve(listener, state, shutdown_signal).await?;

    info!("👋 Gateway shutdown complete");

    Ok(())
}

/// Serve the gateway on an already bound listener
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), ProxyError> {
    let app = routes::create_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(ProxyError::Serve)
}

/// Log every object in the bucket, not only those under the key prefix
pub async fn list_objects(state: &AppState) -> Result<usize, ProxyError> {
    info!(store = %state.store.describe(), "Listing objects");

    let objects = state.store.list_objects("").await?;
    for object in &objects {
        info!(
            name = %object.name,
            size = ?object.size,
            updated = ?object.updated,
            "Object"
        );
    }
    info!(count = objects.len(), "Listed objects");

    Ok(objects.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;
    use gcs_proxy_store::MemoryObjectStore;

    #[tokio::test]
    async fn test_list_objects_covers_whole_bucket() {
        let store = MemoryObjectStore::new();
        store.put("site/a.html", "a");
        store.put("site/b.html", "b");
        store.put("elsewhere.txt", "c");

        let config = GatewayConfig {
            proxy: ProxyConfig {
                key_prefix: "site/".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let state = AppState::with_store(config, Arc::new(store));

        assert_eq!(list_objects(&state).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_missing_bucket_fails_startup() {
        let result = run_server(GatewayConfig::default()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_serve_stops_on_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = GatewayConfig {
            use_memory_store: true,
            ..Default::default()
        };
        let state = Arc::new(AppState::new(config).unwrap());

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(serve(listener, state, async {
            rx.await.ok();
        }));

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
