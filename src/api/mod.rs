pub mod health;
pub mod reports;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .nest("/webhooks", webhooks::webhook_routes())
        .merge(health::health_routes())
        .with_state(state)
}

/// JSON API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(reports::report_routes())
        .merge(health::health_alias_routes())
}
