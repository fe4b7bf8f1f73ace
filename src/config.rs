use std::env;
use std::time::Duration;

pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com";
pub const DEFAULT_POSTMARK_API_URL: &str = "https://api.postmarkapp.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub frontend_url: Option<String>,
    pub resend_api_key: Option<String>,
    pub resend_api_url: String,
    pub postmark_server_token: Option<String>,
    pub postmark_api_url: String,
    pub provider_timeout_seconds: u64,
    pub calendly_signing_key: Option<String>,
    pub signature_tolerance_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        // SERVER_PORT wins; PORT is what most hosting platforms inject
        let port = env::var("SERVER_PORT")
            .or_else(|_| env::var("PORT"))
            .unwrap_or_else(|_| "5000".to_string());

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: port.parse().map_err(|_| ConfigError::InvalidPort(port))?,
            frontend_url: non_empty_var("FRONTEND_URL"),
            resend_api_key: non_empty_var("RESEND_API_KEY"),
            resend_api_url: env::var("RESEND_API_URL")
                .unwrap_or_else(|_| DEFAULT_RESEND_API_URL.to_string()),
            postmark_server_token: non_empty_var("POSTMARK_SERVER_TOKEN"),
            postmark_api_url: env::var("POSTMARK_API_URL")
                .unwrap_or_else(|_| DEFAULT_POSTMARK_API_URL.to_string()),
            provider_timeout_seconds: match env::var("PROVIDER_TIMEOUT_SECS") {
                Ok(raw) => parse_positive_secs(&raw).ok_or(ConfigError::InvalidTimeout(raw))?,
                Err(_) => 10,
            },
            calendly_signing_key: non_empty_var("CALENDLY_WEBHOOK_SIGNING_KEY"),
            signature_tolerance_seconds: match env::var("CALENDLY_SIGNATURE_TOLERANCE_SECS") {
                Ok(raw) => parse_positive_secs(&raw).ok_or(ConfigError::InvalidTolerance(raw))?,
                Err(_) => 180,
            },
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_seconds)
    }
}

/// Whole seconds, at least 1.
fn parse_positive_secs(raw: &str) -> Option<u64> {
    raw.trim().parse().ok().filter(|secs| *secs > 0)
}

/// Unset and blank variables both count as absent credentials.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server port: {0}")]
    InvalidPort(String),
    #[error("PROVIDER_TIMEOUT_SECS must be a positive integer, got {0}")]
    InvalidTimeout(String),
    #[error("CALENDLY_SIGNATURE_TOLERANCE_SECS must be a positive integer, got {0}")]
    InvalidTolerance(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_host: "0.0.0.0".to_string(),
            server_port: 5000,
            frontend_url: None,
            resend_api_key: None,
            resend_api_url: DEFAULT_RESEND_API_URL.to_string(),
            postmark_server_token: None,
            postmark_api_url: DEFAULT_POSTMARK_API_URL.to_string(),
            provider_timeout_seconds: 10,
            calendly_signing_key: None,
            signature_tolerance_seconds: 180,
        }
    }
}
