use crate::core::models::{email::Email, user::User};
use crate::core::ports::mailer::Mailer;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Sending half of the notification queue. Handlers enqueue and move on; the
/// worker started with [`run`] owns delivery and reports each outcome to the log.
#[derive(Clone)]
pub struct Outbox {
    sender: UnboundedSender<Email>,
}

impl Outbox {
    pub fn channel() -> (Self, UnboundedReceiver<Email>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Returns false when the worker has stopped and the message was dropped.
    pub fn dispatch(&self, email: Email) -> bool {
        match self.sender.send(email) {
            Ok(()) => true,
            Err(e) => {
                log::error!("outbox is closed, \"{}\" to {:?} was not queued", e.0.subject, e.0.recipients);
                false
            }
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
}

pub async fn run<M>(mailer: M, mut receiver: UnboundedReceiver<Email>) -> DeliveryReport
where
    M: Mailer,
{
    let mut report = DeliveryReport::default();
    while let Some(email) = receiver.recv().await {
        match mailer.send(&email).await {
            Ok(()) => {
                report.sent += 1;
                log::info!("sent \"{}\" to {}", email.subject, email.recipients.join(", "));
            }
            Err(e) => {
                report.failed += 1;
                log::error!("failed to send \"{}\" to {}: {}", email.subject, email.recipients.join(", "), e);
            }
        }
    }
    log::info!("outbox drained (sent: {}, failed: {})", report.sent, report.failed);
    report
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn credentials(user: &User, password: &str) -> Email {
    Email {
        subject: "Your workshop credentials".into(),
        text: format!(
            "Hello {},\n\nYour login DNI is: {}\nYour password is: {}\n\nYou can change it from your profile once logged in.\n",
            user.name, user.dni, password
        ),
        html: format!(
            "<p>Hello {},</p><p>Your login DNI is: <strong>{}</strong></p><p>Your password is: <strong>{}</strong></p><p>You can change it from your profile once logged in.</p>",
            escape_html(&user.name),
            escape_html(&user.dni),
            escape_html(password)
        ),
        recipients: vec![user.email.clone()],
    }
}

pub fn password_changed(user: &User) -> Email {
    let full_name = format!("{} {}", user.name, user.lastname);
    Email {
        subject: "Password changed".into(),
        text: format!("Hello {},\n\nYour password has been updated.\n", full_name.trim()),
        html: format!("<p>Hello {},</p><p>Your password has been updated.</p>", escape_html(full_name.trim())),
        recipients: vec![user.email.clone()],
    }
}
