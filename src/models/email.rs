/// Outbound plain-text email. Only the recipient varies between messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    to: String,
    from: String,
    subject: String,
    body: String,
}

impl EmailMessage {
    pub(crate) fn new(to: String, from: &str, subject: &str, body: &str) -> Self {
        Self {
            to,
            from: from.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        }
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Which provider slot delivered a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderUsed {
    Primary,
    Fallback,
    None,
}

/// Outcome of a dispatch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub sent: bool,
    pub provider_used: ProviderUsed,
    pub error: Option<String>,
}

impl DispatchResult {
    pub fn delivered(provider_used: ProviderUsed) -> Self {
        Self {
            sent: true,
            provider_used,
            error: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            sent: false,
            provider_used: ProviderUsed::None,
            error: Some(reason.into()),
        }
    }
}
