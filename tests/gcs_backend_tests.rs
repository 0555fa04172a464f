use gcs_proxy::cli::{AppState, GatewayConfig, ProxyConfig, routes};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BUCKET: &str = "www-bucket";

// Proxy backed by the GCS store, talking to a mock storage API
async fn spawn_proxy(storage: &MockServer, proxy: ProxyConfig) -> String {
    let config = GatewayConfig {
        bucket: BUCKET.to_string(),
        gcs_endpoint: storage.uri(),
        proxy,
        ..Default::default()
    };

    let state = Arc::new(AppState::new(config).unwrap());
    let app = routes::create_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn object_path(key: &str) -> String {
    format!("/storage/v1/b/{}/o/{}", BUCKET, key.replace('/', "%2F"))
}

async fn mount_media(storage: &MockServer, key: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(object_path(key)))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(storage)
        .await;
}

fn site_config(missing: &str, suppress: bool) -> ProxyConfig {
    ProxyConfig {
        key_prefix: "site/".to_string(),
        index_name: "index.html".to_string(),
        fallback_name: missing.to_string(),
        suppress_not_found: suppress,
    }
}

#[tokio::test]
async fn test_index_served_from_bucket() {
    let storage = MockServer::start().await;
    mount_media(&storage, "site/index.html", 200, "<html>ok</html>").await;

    let base_url = spawn_proxy(&storage, site_config("", false)).await;

    let res = Client::new().get(format!("{}/", base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), "<html>ok</html>");
}

#[tokio::test]
async fn test_missing_object_falls_back() {
    let storage = MockServer::start().await;
    mount_media(&storage, "site/gone.html", 404, "No such object").await;
    mount_media(&storage, "site/404.html", 200, "<html>missing</html>").await;

    let base_url = spawn_proxy(&storage, site_config("404.html", false)).await;

    let res = Client::new()
        .get(format!("{}/gone.html", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "<html>missing</html>");
}

#[tokio::test]
async fn test_permission_error_does_not_fall_back() {
    let storage = MockServer::start().await;
    mount_media(&storage, "site/private.html", 403, "Forbidden").await;
    Mock::given(method("GET"))
        .and(path(object_path("site/404.html")))
        .respond_with(ResponseTemplate::new(200).set_body_string("fallback"))
        .expect(0)
        .mount(&storage)
        .await;

    let base_url = spawn_proxy(&storage, site_config("404.html", true)).await;

    let res = Client::new()
        .get(format!("{}/private.html", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_root_without_index_sends_no_request() {
    let storage = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("collection"))
        .expect(0)
        .mount(&storage)
        .await;

    let config = ProxyConfig {
        fallback_name: "404.html".to_string(),
        suppress_not_found: true,
        ..Default::default()
    };
    let base_url = spawn_proxy(&storage, config).await;

    let res = Client::new().get(format!("{}/", base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_head_uses_metadata() {
    let storage = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(object_path("site/app.js")))
        .respond_with(ResponseTemplate::new(200).set_body_json(app_js_resource()))
        .mount(&storage)
        .await;
    Mock::given(method("GET"))
        .and(path(object_path("site/none.js")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&storage)
        .await;

    let base_url = spawn_proxy(&storage, site_config("404.html", true)).await;
    let client = Client::new();

    let res = client.head(format!("{}/app.js", base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/javascript");

    let res = client.head(format!("{}/none.js", base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

fn app_js_resource() -> serde_json::Value {
    serde_json::json!({
        "name": "site/app.js",
        "size": "14",
        "contentType": "text/javascript"
    })
}
