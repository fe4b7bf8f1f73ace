use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::{AppError, Result};

/// Raw Calendly webhook body as delivered to `/webhooks/calendly`
#[derive(Debug, Clone, Deserialize)]
pub struct CalendlyWebhook {
    pub event: String,
    pub payload: CalendlyPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalendlyPayload {
    pub invitee: Invitee,
    #[serde(default)]
    pub event_type: Option<EventTypeInfo>,
    #[serde(default)]
    pub event: Option<ScheduledEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Invitee {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventTypeInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduledEvent {
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Validated view of a webhook delivery. Lives for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    event_type: String,
    invitee_email: String,
    invitee_name: String,
    scheduled_event_name: String,
}

impl InboundEvent {
    /// Parse and validate a raw request body.
    ///
    /// `event` and `payload.invitee.email` are required; the email must be a
    /// syntactically valid address. Every other field may be absent.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let webhook: CalendlyWebhook = serde_json::from_slice(body)?;
        Self::try_from(webhook)
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn invitee_email(&self) -> &str {
        &self.invitee_email
    }

    pub fn invitee_name(&self) -> &str {
        &self.invitee_name
    }

    pub fn scheduled_event_name(&self) -> &str {
        &self.scheduled_event_name
    }
}

impl TryFrom<CalendlyWebhook> for InboundEvent {
    type Error = AppError;

    fn try_from(webhook: CalendlyWebhook) -> Result<Self> {
        let event_type = webhook.event.trim().to_string();
        if event_type.is_empty() {
            return Err(AppError::InvalidPayload("event is empty".to_string()));
        }

        let invitee_email = webhook
            .payload
            .invitee
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| AppError::InvalidPayload("payload.invitee.email is required".to_string()))?;

        if !invitee_email.validate_email() {
            return Err(AppError::InvalidPayload(format!(
                "payload.invitee.email is not a valid address: {}",
                invitee_email
            )));
        }

        let scheduled_event_name = webhook
            .payload
            .event_type
            .and_then(|t| t.name)
            .unwrap_or_default();

        Ok(Self {
            event_type,
            invitee_email,
            invitee_name: webhook.payload.invitee.name.unwrap_or_default(),
            scheduled_event_name,
        })
    }
}

/// JSON acknowledgment returned for every well-formed delivery
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Acknowledgment {
    pub received: bool,
    pub event_type: String,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitee_email: Option<String>,
}

impl Acknowledgment {
    /// Delivery received but the event did not qualify; nothing was sent.
    pub fn skipped(event: &InboundEvent) -> Self {
        Self {
            received: true,
            event_type: event.event_type().to_string(),
            email_sent: false,
            invitee_email: None,
        }
    }

    pub fn handled(event: &InboundEvent, email_sent: bool) -> Self {
        Self {
            received: true,
            event_type: event.event_type().to_string(),
            email_sent,
            invitee_email: Some(event.invitee_email().to_string()),
        }
    }
}
