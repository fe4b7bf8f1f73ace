use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::filter::is_intro_call;
use crate::mail::render_intro_email;
use crate::models::{Acknowledgment, InboundEvent};
use crate::security::{self, SIGNATURE_HEADER};
use crate::state::AppState;

/// Webhook routes
pub fn webhook_routes() -> Router<AppState> {
    Router::new().route("/calendly", post(calendly_webhook))
}

/// POST /webhooks/calendly - Send the intro-call follow-up email
///
/// Only a malformed payload (or a bad signature, when a signing key is
/// configured) is reported as an error. Delivery problems are logged and
/// show up as `email_sent: false`.
async fn calendly_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Acknowledgment>> {
    let delivery_id = Uuid::new_v4();

    if let Some(signing_key) = state.config.calendly_signing_key.as_deref() {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());

        security::verify(
            signing_key,
            signature,
            &body,
            Utc::now().timestamp(),
            state.config.signature_tolerance_seconds,
        )
        .map_err(|e| {
            tracing::warn!(%delivery_id, error = %e, "Rejected Calendly webhook");
            AppError::Unauthorized(e.to_string())
        })?;
    }

    let event = InboundEvent::parse(&body).map_err(|e| {
        tracing::warn!(%delivery_id, error = %e, "Malformed Calendly webhook");
        e
    })?;

    tracing::info!(
        %delivery_id,
        event_type = %event.event_type(),
        event_name = %event.scheduled_event_name(),
        "Calendly webhook received"
    );

    if !is_intro_call(event.scheduled_event_name()) {
        tracing::info!(%delivery_id, "Not an intro call, no email sent");
        return Ok(Json(Acknowledgment::skipped(&event)));
    }

    let email_sent = match render_intro_email(event.invitee_email()) {
        Ok(message) => {
            let result = state.dispatcher.dispatch(&message).await;
            tracing::info!(
                %delivery_id,
                invitee = %event.invitee_email(),
                sent = result.sent,
                provider = ?result.provider_used,
                "Intro call follow-up processed"
            );
            result.sent
        }
        Err(e) => {
            tracing::warn!(%delivery_id, error = %e, "Intro email not rendered");
            false
        }
    };

    Ok(Json(Acknowledgment::handled(&event, email_sent)))
}
