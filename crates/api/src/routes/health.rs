use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
    /// Number of registered schemas.
    pub schemas_loaded: usize,
    /// Registered schema ids.
    pub schemas: Vec<String>,
}

/// GET /health -- returns service status and loaded-schema info.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let summaries = state.engine.registry().list();

    Json(HealthResponse {
        status: "healthy",
        service: "validator",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
        schemas_loaded: summaries.len(),
        schemas: summaries.into_iter().map(|s| s.schema_id).collect(),
    })
}

/// Mount health check routes (root-level).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
