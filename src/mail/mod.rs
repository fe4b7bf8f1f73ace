pub mod postmark;
pub mod resend;
pub mod template;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::Config;
use crate::models::{DispatchResult, EmailMessage, ProviderUsed};

pub use template::render_intro_email;

/// Failures raised by an email provider. These never leave the dispatcher.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} did not respond within {timeout:?}")]
    Timeout {
        provider: &'static str,
        timeout: Duration,
    },

    #[error("no email provider configured")]
    NotConfigured,

    #[error("recipient address is empty")]
    InvalidRecipient,

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(#[from] reqwest::Error),
}

/// A transactional email provider
#[async_trait]
pub trait Sender: Send + Sync {
    /// Provider name used in logs and error messages
    fn name(&self) -> &'static str;

    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Delivers a message through the primary provider, falling back to the
/// secondary one. Delivery failures are reported in the `DispatchResult`,
/// never returned as errors.
#[derive(Clone)]
pub struct Dispatcher {
    senders: Vec<(ProviderUsed, Arc<dyn Sender>)>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        primary: Option<Arc<dyn Sender>>,
        fallback: Option<Arc<dyn Sender>>,
        timeout: Duration,
    ) -> Self {
        let senders = [(ProviderUsed::Primary, primary), (ProviderUsed::Fallback, fallback)]
            .into_iter()
            .filter_map(|(slot, sender)| sender.map(|s| (slot, s)))
            .collect();

        Self { senders, timeout }
    }

    /// Build the Resend (primary) and Postmark (fallback) senders from
    /// whichever credentials are present.
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        let client = Client::builder().timeout(config.provider_timeout()).build()?;

        let primary = config.resend_api_key.as_ref().map(|key| {
            Arc::new(resend::ResendSender::new(
                client.clone(),
                key.clone(),
                config.resend_api_url.clone(),
            )) as Arc<dyn Sender>
        });

        let fallback = config.postmark_server_token.as_ref().map(|token| {
            Arc::new(postmark::PostmarkSender::new(
                client.clone(),
                token.clone(),
                config.postmark_api_url.clone(),
            )) as Arc<dyn Sender>
        });

        Ok(Self::new(primary, fallback, config.provider_timeout()))
    }

    pub fn has_primary(&self) -> bool {
        self.has_slot(ProviderUsed::Primary)
    }

    pub fn has_fallback(&self) -> bool {
        self.has_slot(ProviderUsed::Fallback)
    }

    fn has_slot(&self, slot: ProviderUsed) -> bool {
        self.senders.iter().any(|(s, _)| *s == slot)
    }

    /// Try each configured provider once, in order.
    pub async fn dispatch(&self, message: &EmailMessage) -> DispatchResult {
        if self.senders.is_empty() {
            let err = MailError::NotConfigured;
            tracing::warn!(to = %message.to(), error = %err, "Email not sent");
            return DispatchResult::failed(err.to_string());
        }

        let mut failures = Vec::with_capacity(self.senders.len());

        for (slot, sender) in &self.senders {
            match self.attempt(sender.as_ref(), message).await {
                Ok(()) => {
                    tracing::info!(
                        provider = sender.name(),
                        slot = ?slot,
                        to = %message.to(),
                        "Email sent"
                    );
                    return DispatchResult::delivered(*slot);
                }
                Err(e) => {
                    tracing::warn!(provider = sender.name(), error = %e, "Email provider failed");
                    failures.push(e.to_string());
                }
            }
        }

        let reason = failures.join("; ");
        tracing::warn!(to = %message.to(), error = %reason, "Email not sent, all providers failed");
        DispatchResult::failed(reason)
    }

    async fn attempt(&self, sender: &dyn Sender, message: &EmailMessage) -> Result<(), MailError> {
        match tokio::time::timeout(self.timeout, sender.send(message)).await {
            Ok(result) => result,
            Err(_) => Err(MailError::Timeout {
                provider: sender.name(),
                timeout: self.timeout,
            }),
        }
    }
}
