pub mod calendly;
pub mod email;

pub use calendly::{
    Acknowledgment,
    CalendlyWebhook,
    InboundEvent,
};

pub use email::{
    DispatchResult,
    EmailMessage,
    ProviderUsed,
};
