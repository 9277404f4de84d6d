//! Error types for the signup verification Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while processing a verification request.
#[derive(Error, Debug)]
pub enum Error {
    /// The inbound event could not be interpreted (no records, unparsable
    /// message, missing or invalid email). Redelivery will not help.
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Secrets Manager retrieval or parse failure
    #[error("Secrets error: {0}")]
    Secrets(String),

    /// The email provider rejected or failed the send
    #[error("Email delivery error: {0}")]
    EmailDelivery(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether redelivering the same event could plausibly succeed.
    ///
    /// Malformed events and bad configuration fail the same way every time;
    /// provider and datastore failures are transient from this component's
    /// point of view.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::MalformedEvent(_) | Error::Config(_) | Error::Serialization(_) => false,
            Error::Secrets(_) | Error::EmailDelivery(_) | Error::Database(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_event_is_not_retryable() {
        assert!(!Error::MalformedEvent("no records".into()).is_retryable());
        assert!(!Error::Config("DB_HOST not set".into()).is_retryable());
    }

    #[test]
    fn test_provider_failures_are_retryable() {
        assert!(Error::EmailDelivery("503 from provider".into()).is_retryable());
        assert!(Error::Secrets("throttled".into()).is_retryable());
    }
}
