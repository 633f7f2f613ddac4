use std::sync::Arc;

use fieldgate_core::validation::engine::ValidationEngine;
use fieldgate_events::EventBus;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Validation engine owning the schema registry.
    pub engine: Arc<ValidationEngine>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for publishing validation lifecycle events.
    pub event_bus: Arc<EventBus>,
}
