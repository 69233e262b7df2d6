use crate::core::models::email::Email;
use crate::error::Error;

pub trait Mailer {
    async fn send(&self, email: &Email) -> Result<(), Error>;
}
