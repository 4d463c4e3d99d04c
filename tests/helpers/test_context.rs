//! Test context for unified test setup
//!
//! Bundles a test database with the application state and router built on
//! top of it, plus a small client for driving the router in-process.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use reservehub::config::Settings;
use reservehub::services::USER_ID_HEADER;
use reservehub::AppState;

use super::database_helper::TestDatabase;

/// Unified test context that manages all test components
pub struct TestContext {
    pub database: TestDatabase,
    pub state: AppState,
    pub router: Router,
}

impl TestContext {
    /// Create a test context with default settings
    pub fn new(database: TestDatabase) -> Self {
        Self::new_with_settings(database, Self::create_test_settings())
    }

    /// Create a test context with custom settings
    pub fn new_with_settings(database: TestDatabase, settings: Settings) -> Self {
        let state = AppState::new(database.pool.clone(), settings);
        let router = reservehub::router(state.clone()).expect("Failed to build router");

        Self {
            database,
            state,
            router,
        }
    }

    pub fn create_test_settings() -> Settings {
        Settings::default()
    }

    /// Send a request as `user_id` (or anonymously) and return status and JSON body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        user_id: Option<i64>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(&self.router, method, uri, user_id, body).await
    }
}

/// Drive a router with one request and decode the JSON response (Null when empty)
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    user_id: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(id) = user_id {
        builder = builder.header(USER_ID_HEADER, id.to_string());
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Router failed");

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response is not JSON")
    };

    (status, json)
}
