use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use calmprofile_notifier::api;
use calmprofile_notifier::config::Config;
use calmprofile_notifier::mail::Dispatcher;
use calmprofile_notifier::state::AppState;

/// Upper bound for a whole request, provider attempts included
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting calm.profile notifier...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(
        host = %config.server_host,
        port = %config.server_port,
        signature_check = config.calendly_signing_key.is_some(),
        "Configuration loaded"
    );

    let dispatcher = Dispatcher::from_config(&config)?;
    match (dispatcher.has_primary(), dispatcher.has_fallback()) {
        (true, true) => tracing::info!("Email providers: resend (primary), postmark (fallback)"),
        (true, false) => tracing::info!("Email provider: resend only"),
        (false, true) => tracing::info!("Email provider: postmark only"),
        (false, false) => {
            tracing::warn!("No email provider configured, intro call emails will not be sent")
        }
    }

    let cors = match config.frontend_url.as_deref() {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.trim_end_matches('/').parse::<HeaderValue>()?),
        None => CorsLayer::new().allow_origin(Any),
    }
    .allow_methods(Any)
    .allow_headers(Any);

    let addr: SocketAddr = config.server_addr().parse()?;
    let state = AppState::new(config, dispatcher);

    // Build router
    let app = Router::new()
        .merge(api::create_router(state))
        .layer(cors)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Handle shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down...");
        },
    }
}
