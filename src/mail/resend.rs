use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::mail::{MailError, Sender};
use crate::models::EmailMessage;

const PROVIDER: &str = "resend";

#[derive(Clone)]
pub struct ResendSender {
    client: Client,
    api_key: String,
    base_url: String,
}

impl ResendSender {
    pub fn new(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Sender for ResendSender {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            from: &'a str,
            to: Vec<&'a str>,
            subject: &'a str,
            text: &'a str,
        }

        let payload = Payload {
            from: message.from(),
            to: vec![message.to()],
            subject: message.subject(),
            text: message.body(),
        };

        let res = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::Transport {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(MailError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}
