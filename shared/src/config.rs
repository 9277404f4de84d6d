//! Configuration management for the verification Lambda.

use std::env;

use crate::{Error, Result};

/// Default token length in bytes; the hex token is twice this many chars.
pub const DEFAULT_TOKEN_BYTES: usize = 16;

/// Tokens shorter than this are too guessable to accept from configuration.
pub const MIN_TOKEN_BYTES: usize = 16;

/// Default validity window for a verification link, in seconds.
pub const DEFAULT_TTL_SECS: i64 = 120;

/// How database credentials are supplied.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    /// Plain value from the environment.
    Plain(String),
    /// ARN of a Secrets Manager secret to resolve at startup.
    SecretArn(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Database host
    pub db_host: String,
    /// Database user
    pub db_username: String,
    /// Database name
    pub db_name: String,
    /// Database port
    pub db_port: u16,
    /// Database password, plain or via Secrets Manager
    pub db_password: CredentialSource,
    /// Domain embedded in verification links
    pub domain_name: String,
    /// SendGrid API key, plain or via Secrets Manager
    pub sendgrid_api_key: CredentialSource,
    /// Sender address for verification emails
    pub from_email: String,
    /// Verification token length in bytes
    pub token_bytes: usize,
    /// Verification link validity window in seconds
    pub ttl_secs: i64,
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("{} not set", name)))
}

fn first_of(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| env::var(name).ok())
}

impl Config {
    /// Load configuration from environment variables, failing fast with the
    /// name of whatever is missing.
    pub fn from_env() -> Result<Self> {
        let db_password = match env::var("DB_PASSWORD").ok() {
            Some(plain) => CredentialSource::Plain(plain),
            None => CredentialSource::SecretArn(env::var("DB_SECRET_ARN").map_err(|_| {
                Error::Config("DB_PASSWORD or DB_SECRET_ARN not set".to_string())
            })?),
        };

        let sendgrid_api_key = match env::var("SENDGRID_API_KEY").ok() {
            Some(plain) => CredentialSource::Plain(plain),
            None => CredentialSource::SecretArn(
                env::var("SENDGRID_API_KEY_SECRET_ARN").map_err(|_| {
                    Error::Config(
                        "SENDGRID_API_KEY or SENDGRID_API_KEY_SECRET_ARN not set".to_string(),
                    )
                })?,
            ),
        };

        let db_port = match env::var("DB_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| Error::Config(format!("DB_PORT is not a valid port: {}", raw)))?,
            Err(_) => 5432,
        };

        Ok(Self {
            db_host: required("DB_HOST")?,
            db_username: required("DB_USERNAME")?,
            db_name: first_of(&["DB_NAME", "DB_DATABASE"])
                .ok_or_else(|| Error::Config("DB_NAME not set".to_string()))?,
            db_port,
            db_password,
            domain_name: required("DOMAIN_NAME")?,
            sendgrid_api_key,
            from_email: required("SENDGRID_FROM_EMAIL")?,
            token_bytes: parse_token_bytes(env::var("TOKEN_LENGTH_BYTES").ok().as_deref())?,
            ttl_secs: parse_ttl_secs(env::var("VERIFICATION_TTL_SECS").ok().as_deref())?,
        })
    }
}

fn parse_token_bytes(raw: Option<&str>) -> Result<usize> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TOKEN_BYTES);
    };
    let bytes = raw
        .parse::<usize>()
        .map_err(|_| Error::Config(format!("TOKEN_LENGTH_BYTES is not a number: {}", raw)))?;
    if bytes < MIN_TOKEN_BYTES {
        return Err(Error::Config(format!(
            "TOKEN_LENGTH_BYTES must be at least {}, got {}",
            MIN_TOKEN_BYTES, bytes
        )));
    }
    Ok(bytes)
}

fn parse_ttl_secs(raw: Option<&str>) -> Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TTL_SECS);
    };
    let secs = raw
        .parse::<i64>()
        .map_err(|_| Error::Config(format!("VERIFICATION_TTL_SECS is not a number: {}", raw)))?;
    if secs <= 0 {
        return Err(Error::Config(format!(
            "VERIFICATION_TTL_SECS must be positive, got {}",
            secs
        )));
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_bytes_default_and_minimum() {
        assert_eq!(parse_token_bytes(None).unwrap(), DEFAULT_TOKEN_BYTES);
        assert_eq!(parse_token_bytes(Some("20")).unwrap(), 20);
        assert!(parse_token_bytes(Some("8")).is_err());
        assert!(parse_token_bytes(Some("twenty")).is_err());
    }

    #[test]
    fn test_ttl_default_and_bounds() {
        assert_eq!(parse_ttl_secs(None).unwrap(), DEFAULT_TTL_SECS);
        assert_eq!(parse_ttl_secs(Some("300")).unwrap(), 300);
        assert!(parse_ttl_secs(Some("0")).is_err());
        assert!(parse_ttl_secs(Some("-5")).is_err());
    }
}
