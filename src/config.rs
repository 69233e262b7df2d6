use crate::error::Error;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub upload_limit: usize,
    pub mail: Option<MailConfig>,
}

impl Config {
    /// Loads the configuration from the process environment (and `.env`, if present).
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).filter(|v| !v.is_empty()).ok_or_else(|| Error::Config(format!("environment variable {} not been set", key)));
        let mail = lookup("MAIL_API_URL").filter(|v| !v.is_empty()).map(|api_url| MailConfig {
            api_url,
            api_key: lookup("MAIL_API_KEY").filter(|v| !v.is_empty()),
            from: lookup("MAIL_FROM").unwrap_or_else(|| "no-reply@localhost".into()),
        });
        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "PORT", 8000)?,
            database_url: required("DATABASE_URL")?,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            jwt_secret: required("JWT_SECRET")?,
            token_ttl_days: parse_or(&lookup, "TOKEN_TTL_DAYS", 30)?,
            upload_limit: parse_or(&lookup, "UPLOAD_LIMIT_BYTES", 1024 * 1024)?,
            mail,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| Error::Config(format!("invalid value for {}: {}", key, v))),
    }
}
