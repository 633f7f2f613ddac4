//! Route definitions for the `/schemas` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::schemas;
use crate::state::AppState;

/// Schema inspection routes.
///
/// ```text
/// GET /schemas              -> list registered schemas (metadata only)
/// GET /schemas/{schema_id}  -> full schema detail, including rules
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/schemas", get(schemas::list_schemas))
        .route("/schemas/{schema_id}", get(schemas::get_schema))
}
