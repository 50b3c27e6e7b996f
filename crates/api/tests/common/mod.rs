use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tgcrm_core::service::CustomerService;
use tgcrm_core::store::MemoryCustomerStore;
use tower::ServiceExt;

use tgcrm_api::config::{LogFormat, ServerConfig, StoreBackend};
use tgcrm_api::router::build_app_router;
use tgcrm_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout, and the in-memory store.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        seed_demo_customers: false,
        log_format: LogFormat::Text,
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// Returns the service alongside the router so tests can inspect the store
/// directly after a request.
pub fn build_test_app() -> (Router, Arc<CustomerService>) {
    let customers = Arc::new(CustomerService::new(Arc::new(MemoryCustomerStore::new())));
    let state = AppState {
        customers: Arc::clone(&customers),
        config: Arc::new(test_config()),
    };
    (build_app_router(state), customers)
}

/// Like [`build_test_app`], with the three demo customers (ids 1001..=1003)
/// already registered.
pub async fn build_seeded_app() -> (Router, Arc<CustomerService>) {
    let (app, customers) = build_test_app();
    customers
        .seed_demo_customers()
        .await
        .expect("seeding an empty store succeeds");
    (app, customers)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a raw body with a JSON content type.
pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
