use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::state::AppState;

/// Health response structure
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub primary_provider: String,
    pub fallback_provider: String,
    pub timestamp: String,
}

/// Health routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}

/// `/api/health`, kept for older clients
pub fn health_alias_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET / - Service banner
async fn root() -> Json<Value> {
    Json(json!({"service": "calm.profile_api", "status": "ok"}))
}

fn provider_status(configured: bool) -> &'static str {
    if configured {
        "configured"
    } else {
        "missing"
    }
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let has_primary = state.dispatcher.has_primary();
    let has_fallback = state.dispatcher.has_fallback();

    // still serving webhooks without providers, but no email will go out
    let overall_status = if has_primary || has_fallback {
        "healthy"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: overall_status.to_string(),
        primary_provider: provider_status(has_primary).to_string(),
        fallback_provider: provider_status(has_fallback).to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
