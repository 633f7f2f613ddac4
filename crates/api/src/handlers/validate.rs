//! Handlers for the `/validate` endpoints.
//!
//! Thin wrappers around the core [`ValidationEngine`] that publish
//! lifecycle events on the bus around each evaluation. Publication is
//! fire-and-forget: a full or unobserved bus never blocks or fails a
//! validation call.
//!
//! [`ValidationEngine`]: fieldgate_core::validation::engine::ValidationEngine

use axum::extract::State;
use axum::Json;
use serde_json::json;

use fieldgate_core::validation::engine::ValidateRequest;
use fieldgate_core::validation::report::{BatchReport, ValidationReport};
use fieldgate_events::bus::event_types;
use fieldgate_events::ValidationEvent;

use crate::error::AppResult;
use crate::state::AppState;

/// POST /validate
///
/// Validate one document's fields against a registered schema. Returns the
/// full report; 404 when the schema id is unknown.
pub async fn validate(
    State(state): State<AppState>,
    Json(body): Json<ValidateRequest>,
) -> AppResult<Json<ValidationReport>> {
    state.event_bus.publish(
        ValidationEvent::new(event_types::VALIDATION_STARTED)
            .with_doc(&body.doc_id)
            .with_schema(&body.schema_id),
    );

    tracing::info!(
        doc_id = %body.doc_id,
        schema_id = %body.schema_id,
        strict = body.strict,
        "Validating document"
    );

    let report = match state
        .engine
        .validate(&body.doc_id, &body.fields, &body.schema_id, body.strict)
    {
        Ok(report) => report,
        Err(e) => {
            state.event_bus.publish(
                ValidationEvent::new(event_types::VALIDATION_FAILED)
                    .with_doc(&body.doc_id)
                    .with_schema(&body.schema_id)
                    .with_payload(json!({ "reason": e.to_string() })),
            );
            return Err(e.into());
        }
    };

    state.event_bus.publish(completion_event(&report));

    tracing::info!(
        doc_id = %report.doc_id,
        valid = report.valid,
        errors = report.summary.total_errors,
        warnings = report.summary.total_warnings,
        "Validation complete"
    );

    Ok(Json(report))
}

/// POST /validate/batch
///
/// Validate an ordered batch. Each slot is evaluated independently: a slot
/// with an unknown schema carries a failure report instead of aborting the
/// batch, and output order always matches input order.
pub async fn validate_batch(
    State(state): State<AppState>,
    Json(body): Json<Vec<ValidateRequest>>,
) -> AppResult<Json<BatchReport>> {
    tracing::info!(documents = body.len(), "Validating batch");

    for req in &body {
        state.event_bus.publish(
            ValidationEvent::new(event_types::VALIDATION_STARTED)
                .with_doc(&req.doc_id)
                .with_schema(&req.schema_id),
        );
    }

    let batch = state.engine.validate_batch(&body);

    for report in &batch.results {
        if report.is_schema_failure() {
            let reason = report
                .errors
                .first()
                .map(|entry| entry.message.as_str())
                .unwrap_or("validation failed");
            state.event_bus.publish(
                ValidationEvent::new(event_types::VALIDATION_FAILED)
                    .with_doc(&report.doc_id)
                    .with_schema(&report.summary.schema_id)
                    .with_payload(json!({ "reason": reason })),
            );
        } else {
            state.event_bus.publish(completion_event(report));
        }
    }

    tracing::info!(documents = batch.total_documents, "Batch validation complete");

    Ok(Json(batch))
}

/// Build the `validation.completed` event for a finished report.
fn completion_event(report: &ValidationReport) -> ValidationEvent {
    ValidationEvent::new(event_types::VALIDATION_COMPLETED)
        .with_doc(&report.doc_id)
        .with_schema(&report.summary.schema_id)
        .with_payload(json!({
            "valid": report.valid,
            "totalErrors": report.summary.total_errors,
            "totalWarnings": report.summary.total_warnings,
        }))
}
