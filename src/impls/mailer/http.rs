use crate::config::MailConfig;
use crate::core::models::email::Email;
use crate::core::ports::mailer::Mailer;
use crate::error::Error;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

/// Hands messages to an HTTP mail relay as a JSON envelope.
pub struct HttpMailer {
    client: reqwest::Client,
    config: MailConfig,
}

impl HttpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

impl Mailer for HttpMailer {
    async fn send(&self, email: &Email) -> Result<(), Error> {
        let envelope = Envelope {
            from: &self.config.from,
            to: &email.recipients,
            subject: &email.subject,
            text: &email.text,
            html: &email.html,
        };
        let mut req = self.client.post(&self.config.api_url).json(&envelope);
        if let Some(key) = &self.config.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await.map_err(|e| Error::Mail(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(Error::Mail(format!("relay responded with {}", resp.status())));
        }
        Ok(())
    }
}
