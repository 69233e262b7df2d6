use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Message {
    message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Message { message: message.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct Token {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct Updated {
    pub message: String,
    pub changed: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: String,
    pub answers_removed: u64,
}
