use axum::{body::Bytes, routing::get, Json, Router};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::report::{self, FieldSpec, NormalizedFields};
use crate::state::AppState;

/// Report field routes
pub fn report_routes() -> Router<AppState> {
    Router::new().route("/report-fields", get(list_fields).post(normalize_fields))
}

/// GET /api/report-fields - Template key set with kinds and defaults
async fn list_fields() -> Json<Vec<FieldSpec>> {
    Json(report::schema())
}

/// POST /api/report-fields - Normalize a camelCase field mapping
async fn normalize_fields(body: Bytes) -> Result<Json<NormalizedFields>> {
    let Value::Object(payload) = serde_json::from_slice::<Value>(&body)? else {
        return Err(AppError::BadRequest(
            "Expected a JSON object of report fields".to_string(),
        ));
    };

    let normalized = report::normalize(payload);
    if !normalized.type_errors.is_empty() {
        tracing::warn!(errors = ?normalized.type_errors, "Report field type errors");
    }

    Ok(Json(normalized))
}
