//! HTTP route definitions

use crate::{AppState, handlers, middleware};
use axum::{Router, middleware as axum_middleware, routing::any};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the gateway router.
///
/// Every path, `/` included, goes to the same method-dispatching handler.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", any(handlers::handle_object))
        .route("/{*path}", any(handlers::handle_object))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
