//! Handlers for the `/schemas` resource.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use fieldgate_core::validation::registry::SchemaSummary;
use fieldgate_core::validation::rules::RuleDefinition;

use crate::error::AppResult;
use crate::state::AppState;

/// Full schema detail: summary metadata plus the declarative rule list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDetail {
    pub schema_id: String,
    pub name: String,
    pub description: String,
    pub rule_count: usize,
    pub rules: Vec<RuleDefinition>,
}

/// GET /schemas
///
/// List all registered schemas (metadata only, no rule dump).
pub async fn list_schemas(State(state): State<AppState>) -> AppResult<Json<Vec<SchemaSummary>>> {
    Ok(Json(state.engine.registry().list()))
}

/// GET /schemas/{schema_id}
///
/// Full detail for one schema, including its rules. 404 when unknown.
pub async fn get_schema(
    State(state): State<AppState>,
    Path(schema_id): Path<String>,
) -> AppResult<Json<SchemaDetail>> {
    let schema = state.engine.registry().get(&schema_id)?;
    let definition = schema.to_definition();

    Ok(Json(SchemaDetail {
        schema_id: definition.schema_id,
        name: definition.name,
        description: definition.description,
        rule_count: schema.rule_count(),
        rules: definition.rules,
    }))
}
