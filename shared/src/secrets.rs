//! AWS Secrets Manager integration.
//!
//! Secrets are resolved exactly once during startup, before the runtime
//! starts accepting invocations; there is no ambient cache.

use aws_sdk_secretsmanager::Client as SecretsClient;
use serde::Deserialize;

use crate::config::CredentialSource;
use crate::{Error, Result};

/// Database credentials stored in Secrets Manager.
#[derive(Debug, Deserialize)]
pub struct DatabaseCredentials {
    pub username: Option<String>,
    pub password: String,
}

/// Get a secret's string value from Secrets Manager.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    let response = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Secrets(format!("Failed to get secret {}: {}", secret_arn, e)))?;

    response
        .secret_string()
        .map(str::to_string)
        .ok_or_else(|| Error::Secrets(format!("Secret {} has no string value", secret_arn)))
}

/// Resolve the database password from a plain value or a credentials secret.
///
/// Credential secrets use the RDS-managed JSON shape, so the password sits
/// under a `password` key rather than being the whole secret string.
pub async fn resolve_db_password(
    client: &SecretsClient,
    source: &CredentialSource,
) -> Result<String> {
    match source {
        CredentialSource::Plain(password) => Ok(password.clone()),
        CredentialSource::SecretArn(arn) => {
            let secret_string = get_secret(client, arn).await?;
            let creds: DatabaseCredentials = serde_json::from_str(&secret_string)
                .map_err(|e| Error::Secrets(format!("Failed to parse database credentials: {}", e)))?;
            Ok(creds.password)
        }
    }
}

/// Resolve the SendGrid API key from a plain value or a string secret.
pub async fn resolve_sendgrid_api_key(
    client: &SecretsClient,
    source: &CredentialSource,
) -> Result<String> {
    match source {
        CredentialSource::Plain(key) => Ok(key.clone()),
        CredentialSource::SecretArn(arn) => get_secret(client, arn).await,
    }
}
