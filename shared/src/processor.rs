//! The verification request pipeline: extract email, generate credentials,
//! send the email, record the attempt.

use tracing::{error, info};

use crate::email::VerificationMailer;
use crate::events::{extract_email, SnsEvent};
use crate::tracking::{AttemptStore, VerificationAttempt};
use crate::verification::generate_credentials;
use crate::Result;

/// Knobs the pipeline needs from configuration.
#[derive(Debug, Clone)]
pub struct VerificationPolicy {
    /// Domain embedded in verification links
    pub domain_name: String,
    /// Token length in bytes
    pub token_bytes: usize,
    /// Link validity window in seconds
    pub ttl_secs: i64,
}

/// Process one signup event end to end.
///
/// The email is sent before the tracking record is written. A store failure
/// therefore leaves an already-sent email with no row behind it; there is no
/// compensating action, and the error propagates so the delivery system can
/// redeliver.
pub async fn process_signup_event(
    policy: &VerificationPolicy,
    mailer: &dyn VerificationMailer,
    store: &dyn AttemptStore,
    event: &SnsEvent,
) -> Result<VerificationAttempt> {
    let email = extract_email(event).inspect_err(|e| {
        error!(error = %e, "Rejecting uninterpretable signup event");
    })?;

    info!(email = %email, "Processing verification request");

    let creds = generate_credentials(
        &policy.domain_name,
        &email,
        policy.token_bytes,
        policy.ttl_secs,
    );

    mailer
        .send_verification(&email, &creds.link, policy.ttl_secs)
        .await
        .inspect_err(|e| {
            error!(email = %email, error = %e, "Email dispatch failed; nothing recorded");
        })?;

    let attempt = VerificationAttempt {
        email,
        token: creds.token,
        expires_at: creds.expires_at,
    };

    store.record_attempt(&attempt).await.inspect_err(|e| {
        // The email is already out; this invocation still fails as a whole.
        error!(email = %attempt.email, error = %e, "Failed to record attempt after send");
    })?;

    Ok(attempt)
}
