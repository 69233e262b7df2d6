use crate::core::models::email::Email;
use crate::core::ports::mailer::Mailer;
use crate::error::Error;

/// Used when no relay is configured. Only the subject and recipients are logged.
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<(), Error> {
        log::info!("mail relay not configured, dropping \"{}\" to {:?}", email.subject, email.recipients);
        Ok(())
    }
}
