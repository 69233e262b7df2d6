use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Email {
    pub subject: String,
    pub text: String,
    pub html: String,
    pub recipients: Vec<String>,
}
