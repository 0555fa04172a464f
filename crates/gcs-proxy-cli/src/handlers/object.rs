//! Object read handlers

use crate::AppState;
use crate::error::{lookup_failure_status, stream_failure_status};
use crate::resolver::{resolve_fallback_key, resolve_key};
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use futures::{StreamExt, TryStreamExt, stream};
use gcs_proxy_store::{ObjectMetadata, ObjectReader, StoreError};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, warn};

/// Methods served by the gateway
pub const ALLOWED_METHODS: &str = "GET, HEAD";

/// Any path - dispatch on method
pub async fn handle_object(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return method_not_allowed();
    }

    // Not a valid object name, so no lookup and no fallback
    let Some(path) = request_path(&uri) else {
        debug!(path = %uri.path(), "Request path is not valid UTF-8");
        return StatusCode::NOT_FOUND.into_response();
    };

    if method == Method::HEAD {
        head_object(&state, &path).await
    } else {
        get_object(&state, &path).await
    }
}

/// Percent-decoded request path, `None` if it does not decode to UTF-8
fn request_path(uri: &Uri) -> Option<String> {
    urlencoding::decode(uri.path()).map(Cow::into_owned).ok()
}

/// GET - stream the object, substituting the fallback object when it does not exist
pub async fn get_object(state: &AppState, path: &str) -> Response {
    let proxy = &state.config.proxy;
    let key = resolve_key(path, proxy);
    debug!(%path, %key, "Resolved object key");

    match state.store.open_reader(&key).await {
        Ok(reader) => stream_object(StatusCode::OK, reader).await,
        Err(err) if err.is_not_found() => match resolve_fallback_key(proxy) {
            Some(fallback_key) => serve_fallback(state, &key, &fallback_key).await,
            None => {
                debug!(%key, "Object not found");
                lookup_failure_status(&err).into_response()
            }
        },
        Err(err) => {
            warn!(%key, error = %err, "Object lookup failed");
            lookup_failure_status(&err).into_response()
        }
    }
}

async fn serve_fallback(state: &AppState, key: &str, fallback_key: &str) -> Response {
    debug!(%key, %fallback_key, "Object not found, serving fallback");

    match state.store.open_reader(fallback_key).await {
        Ok(reader) => {
            let status = if state.config.proxy.suppress_not_found {
                StatusCode::OK
            } else {
                StatusCode::NOT_FOUND
            };
            stream_object(status, reader).await
        }
        Err(err) => {
            if err.is_not_found() {
                debug!(%fallback_key, "Fallback object not found");
            } else {
                warn!(%fallback_key, error = %err, "Fallback lookup failed");
            }
            lookup_failure_status(&err).into_response()
        }
    }
}

/// Stream an opened object as the response body.
///
/// The first chunk is read before the status is committed so that a reader
/// failing immediately still gets a gateway error. Later failures can only
/// abort the body. The reader is dropped, and the backend stream released,
/// on every path out of here including a client going away mid-body.
async fn stream_object(status: StatusCode, reader: ObjectReader) -> Response {
    let (metadata, mut body) = reader.into_parts();

    let first = match body.next().await {
        Some(Ok(chunk)) => Some(chunk),
        Some(Err(err)) => {
            warn!(key = %metadata.name, error = %err, "Object stream failed before first byte");
            return stream_failure_status(&err).into_response();
        }
        None => None,
    };

    let key = metadata.name.clone();
    let body = stream::iter(first.map(Ok::<_, StoreError>))
        .chain(body)
        .inspect_err(move |err| warn!(%key, error = %err, "Object stream aborted"));

    let mut response = Response::new(Body::from_stream(body));
    *response.status_mut() = status;
    apply_object_headers(response.headers_mut(), &metadata);
    response
}

/// HEAD - report existence of the primary object only
pub async fn head_object(state: &AppState, path: &str) -> Response {
    let key = resolve_key(path, &state.config.proxy);
    debug!(%path, %key, "Resolved object key");

    match state.store.metadata(&key).await {
        Ok(metadata) => {
            let mut response = StatusCode::OK.into_response();
            apply_object_headers(response.headers_mut(), &metadata);
            response
        }
        Err(err) => {
            if !err.is_not_found() {
                warn!(%key, error = %err, "Metadata lookup failed");
            }
            lookup_failure_status(&err).into_response()
        }
    }
}

fn apply_object_headers(headers: &mut HeaderMap, metadata: &ObjectMetadata) {
    if let Some(size) = metadata.size {
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size));
    }
    if let Some(value) = metadata
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
    {
        headers.insert(header::CONTENT_TYPE, value);
    }
}

fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, ALLOWED_METHODS)],
    )
        .into_response()
}
