use crate::core::ports::hasher::PasswordHasher;
use hex::ToHex;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 32;

pub fn random_alphanumeric(len: usize) -> String {
    thread_rng().sample_iter(&Alphanumeric).take(len).map(char::from).collect()
}

/// hex(SHA-256(password || salt)).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl PasswordHasher for Sha256Hasher {
    fn hash(&self, password: &str, salt: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password);
        hasher.update(salt);
        hasher.finalize().encode_hex()
    }

    fn gen_salt(&self) -> String {
        random_alphanumeric(SALT_LEN)
    }
}
