//! Shared test harness for E2E integration tests.
//!
//! Wires the admin router and dispatcher to a `MockGateway` and a
//! `MockAuditSink`, so requests exercise real code across crate boundaries.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use jdih_core::CoreConfig;
use jdih_core::audit::MockAuditSink;
use jdih_gateway::MockGateway;
use jdih_protocol::SearchResult;
use jdih_server::config::AppConfig;
use jdih_server::routes::build_router;
use jdih_server::state::AppState;

/// Admin API + dispatcher harness backed by mocks.
pub struct TestHarness {
    pub state: AppState,
    pub router: Router,
    pub gateway: Arc<MockGateway>,
    pub audit: Arc<MockAuditSink>,
}

impl TestHarness {
    /// Harness whose gateway answers every search with `results`.
    pub fn with_results(results: Vec<SearchResult>) -> Self {
        Self::with_gateway(MockGateway::new().with_results(results))
    }

    /// Harness whose gateway finds nothing.
    pub fn empty() -> Self {
        Self::with_gateway(MockGateway::new())
    }

    pub fn with_gateway(gateway: MockGateway) -> Self {
        let config = AppConfig {
            core: CoreConfig::without_delay(),
            ..AppConfig::default()
        };
        let gateway = Arc::new(gateway);
        let audit = Arc::new(MockAuditSink::new());
        let state = AppState::with_audit(&config, gateway.clone(), audit.clone());
        let router = build_router(state.clone());

        Self {
            state,
            router,
            gateway,
            audit,
        }
    }

    /// Send a message through POST /test and return the reply text.
    pub async fn chat(&self, caller: &str, message: &str, platform: &str) -> String {
        let (status, json) = self
            .post(
                "/test",
                serde_json::json!({
                    "phone_number": caller,
                    "message": message,
                    "platform": platform,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        json["response"].as_str().unwrap().to_string()
    }

    /// GET `uri` and return (HTTP status code, response JSON body).
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::get(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    /// POST a JSON body to `uri` and return (HTTP status code, response JSON body).
    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        (status, json)
    }
}

/// A result card the way the gateway hands it over.
pub fn regulation(title: &str, status: &str, link: &str) -> SearchResult {
    SearchResult {
        title: title.into(),
        status: status.into(),
        published_date: "12 Maret 2024".into(),
        view_count: 10,
        detail_link: link.into(),
        ..SearchResult::default()
    }
}
