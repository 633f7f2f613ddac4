//! Route definitions for the validation endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::validate;
use crate::state::AppState;

/// Validation routes.
///
/// ```text
/// POST /validate        -> validate one document
/// POST /validate/batch  -> validate an ordered batch of documents
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/validate", post(validate::validate))
        .route("/validate/batch", post(validate::validate_batch))
}
