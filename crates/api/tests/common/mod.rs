//! Shared test harness for the API integration suites.
//!
//! Builds the real application router (same middleware stack as `main.rs`)
//! with a programmatically seeded schema registry, and provides request
//! helpers driving it via `tower::ServiceExt`.

// Each suite binary compiles this module independently and uses a subset
// of the helpers.
#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use fieldgate_api::config::ServerConfig;
use fieldgate_api::router::build_app_router;
use fieldgate_api::state::AppState;
use fieldgate_core::validation::engine::ValidationEngine;
use fieldgate_core::validation::registry::SchemaRegistry;
use fieldgate_events::EventBus;

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
        schema_dir: "./schemas".into(),
    }
}

/// Seed the registry with the schemas the suites exercise.
fn seed_registry() -> SchemaRegistry {
    let registry = SchemaRegistry::new();

    let document_basic = json!({
        "schemaId": "document_basic",
        "name": "Basic Document Fields",
        "description": "Core identity fields every processed document must carry.",
        "rules": [
            {
                "ruleId": "policy_number_required",
                "field": "policy_number",
                "ruleType": "required",
                "severity": "error",
                "params": {}
            },
            {
                "ruleId": "document_type_allowed",
                "field": "document_type",
                "ruleType": "enum",
                "severity": "warning",
                "params": { "allowedValues": ["policy", "amendment", "renewal"] }
            }
        ]
    });

    let financial_fields = json!({
        "schemaId": "financial_fields",
        "name": "Financial Fields",
        "description": "Numeric and contractual fields extracted from financial sections.",
        "rules": [
            {
                "ruleId": "stop_loss_deductible_range",
                "field": "stop_loss_deductible",
                "ruleType": "range",
                "severity": "error",
                "params": { "min": 0, "max": 10000000 }
            },
            {
                "ruleId": "contract_type_allowed",
                "field": "contract_type",
                "ruleType": "enum",
                "severity": "error",
                "params": { "allowedValues": ["ASO", "Fully Insured", "Self-Funded"] }
            }
        ]
    });

    for definition in [document_basic, financial_fields] {
        registry
            .register(serde_json::from_value(definition).expect("definition should deserialize"))
            .expect("schema should compile");
    }

    registry
}

/// Build the full application router with all middleware layers.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app() -> Router {
    let config = test_config();
    let engine = Arc::new(ValidationEngine::new(seed_registry()));
    let event_bus = Arc::new(EventBus::default());

    let state = AppState {
        engine,
        config: Arc::new(config.clone()),
        event_bus,
    };

    build_app_router(state, &config)
}

/// Send a GET request to the app.
pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request should build"),
    )
    .await
    .expect("request should not fail at the transport level")
}

/// Send a POST request with a JSON body to the app.
pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request should build"),
    )
    .await
    .expect("request should not fail at the transport level")
}

/// Send a POST request with a raw (possibly malformed) body to the app.
pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .expect("request should build"),
    )
    .await
    .expect("request should not fail at the transport level")
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}
