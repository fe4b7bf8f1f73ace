//! Fixed follow-up email sent after an intro call is booked

use crate::mail::MailError;
use crate::models::EmailMessage;

pub const FROM_ADDRESS: &str = "calm.profile <hello@calmprofile.com>";

pub const APP_URL: &str = "https://calmprofile.vercel.app";

pub const SUBJECT: &str = "Before our intro call: your calm.profile assessment";

pub const BODY: &str = "Hi there,

Thanks for booking a 15-minute intro call with calm.profile.

To make the most of our time together, please take the free calm.profile
assessment before we meet. It takes about 10 minutes and shows where your
team's time goes:

    https://calmprofile.vercel.app

What happens next:

  - Free: assessment, archetype and headline overhead estimate
  - $49: full calm.profile report (PDF) with ROI breakdown and
    five prioritized recommendations
  - $1,500: team workflow audit with RASCI mapping and a 30-day plan

If you have questions before the call, just reply to this email.

See you soon,
The calm.profile team
";

/// Render the intro-call follow-up for `to`.
pub fn render_intro_email(to: &str) -> Result<EmailMessage, MailError> {
    let to = to.trim();
    if to.is_empty() {
        return Err(MailError::InvalidRecipient);
    }

    Ok(EmailMessage::new(to.to_string(), FROM_ADDRESS, SUBJECT, BODY))
}
