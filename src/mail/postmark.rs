use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::mail::{MailError, Sender};
use crate::models::EmailMessage;

const PROVIDER: &str = "postmark";

const SERVER_TOKEN_HEADER: &str = "X-Postmark-Server-Token";

#[derive(Clone)]
pub struct PostmarkSender {
    client: Client,
    server_token: String,
    base_url: String,
}

impl PostmarkSender {
    pub fn new(client: Client, server_token: String, base_url: String) -> Self {
        Self {
            client,
            server_token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Payload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
}

/// Postmark answers 200 with a non-zero `ErrorCode` for some rejections
#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SendResponse {
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    message: String,
}

#[async_trait]
impl Sender for PostmarkSender {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let payload = Payload {
            from: message.from(),
            to: message.to(),
            subject: message.subject(),
            text_body: message.body(),
            message_stream: "outbound",
        };

        let res = self
            .client
            .post(format!("{}/email", self.base_url))
            .header(SERVER_TOKEN_HEADER, &self.server_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| MailError::Transport {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        let status = res.status();
        let body = res.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(MailError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        if let Ok(parsed) = serde_json::from_str::<SendResponse>(&body) {
            if parsed.error_code != 0 {
                return Err(MailError::Api {
                    provider: PROVIDER,
                    status: status.as_u16(),
                    body: format!("ErrorCode {}: {}", parsed.error_code, parsed.message),
                });
            }
        }

        Ok(())
    }
}
