use crate::core::ports::tokener::Payload;
use serde::{Deserialize, Serialize};

/// Access-token claims. `user` is the account's DNI.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Claim {
    pub user: String,
    pub exp: i64,
}

impl Payload for Claim {
    fn user(&self) -> &str {
        &self.user
    }
}
