//! Shared helpers for API integration tests.
//!
//! Tests run the real router (same middleware stack as `main.rs`, via
//! [`build_app_router`]) over a fresh in-memory store, and send requests
//! directly with `tower::ServiceExt::oneshot`. No network, no database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use lockpay_api::config::{ServerConfig, StoreBackend};
use lockpay_api::router::build_app_router;
use lockpay_api::state::AppState;
use lockpay_db::MemoryStore;
use lockpay_ledger::{LockLedger, ManualClock};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store_backend: StoreBackend::Memory,
        max_deposit: 1_000_000,
        min_contact_digits: 10,
        min_pin_digits: 4,
        default_lock_duration_secs: 86_400,
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// The router is cheaply cloneable and all clones share the same ledger, so
/// a test can issue a sequence of requests with `app.clone()` per call.
pub fn build_test_app() -> Router {
    let (app, _clock) = build_test_app_with_clock();
    app
}

/// Like [`build_test_app`], but also hands back the manual clock driving the
/// ledger, for tests that cross lock expiry boundaries.
pub fn build_test_app_with_clock() -> (Router, Arc<ManualClock>) {
    let config = test_config();
    let clock = Arc::new(ManualClock::starting_now());
    let ledger = LockLedger::with_parts(
        Arc::new(MemoryStore::new()),
        clock.clone(),
        config.ledger_config(),
    );

    let state = AppState {
        ledger: Arc::new(ledger),
        config: Arc::new(config.clone()),
    };

    (build_app_router(state, &config), clock)
}

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Collect and parse a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Log in with a contact number and return the account id.
pub async fn login(app: &Router, contact: &str) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        serde_json::json!({ "contact": contact }),
    )
    .await;
    let json = body_json(response).await;
    json["data"]["id"].as_i64().expect("login response has no account id")
}

/// Log in and deposit in one step; returns the account id.
pub async fn login_and_deposit(app: &Router, contact: &str, amount_cents: i64) -> i64 {
    let id = login(app, contact).await;
    let response = post_json(
        app.clone(),
        &format!("/api/v1/accounts/{id}/deposit"),
        serde_json::json!({ "amount_cents": amount_cents }),
    )
    .await;
    assert!(
        response.status().is_success(),
        "seed deposit failed with {}",
        response.status()
    );
    id
}
