//! Verification Sender Lambda - Issues email verification links on signup.
//!
//! This Lambda is triggered by SNS and:
//! 1. Extracts the signup email from the SNS message
//! 2. Generates a verification token, expiry, and link
//! 3. Sends the verification email via SendGrid
//! 4. Records the attempt in the email_tracking table

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::Serialize;
use shared::{
    db, process_signup_event, resolve_db_password, resolve_sendgrid_api_key, Config,
    PgAttemptStore, SendGridMailer, SnsEvent, VerificationPolicy,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize)]
struct SenderResponse {
    email: String,
    expires_at: String,
}

struct AppState {
    mailer: SendGridMailer,
    store: PgAttemptStore,
    policy: VerificationPolicy,
}

impl AppState {
    /// Build all collaborator handles up front. Any failure here aborts the
    /// instance before it accepts invocations.
    async fn new() -> Result<Self, Error> {
        let config = Config::from_env()?;

        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let secrets_client = aws_sdk_secretsmanager::Client::new(&aws_config);

        let db_password = resolve_db_password(&secrets_client, &config.db_password).await?;
        let api_key = resolve_sendgrid_api_key(&secrets_client, &config.sendgrid_api_key).await?;

        let pool = db::create_pool(&config, &db_password).await?;

        Ok(Self {
            mailer: SendGridMailer::new(api_key, config.from_email.clone()),
            store: PgAttemptStore::new(pool),
            policy: VerificationPolicy {
                domain_name: config.domain_name,
                token_bytes: config.token_bytes,
                ttl_secs: config.ttl_secs,
            },
        })
    }
}

async fn handler(
    state: Arc<AppState>,
    event: LambdaEvent<SnsEvent>,
) -> Result<SenderResponse, Error> {
    // Errors propagate as invocation failures so SNS redelivery applies.
    let attempt =
        process_signup_event(&state.policy, &state.mailer, &state.store, &event.payload).await?;

    info!(
        email = %attempt.email,
        expires_at = %attempt.expires_at,
        "Verification request complete"
    );

    Ok(SenderResponse {
        email: attempt.email,
        expires_at: attempt.expires_at.to_rfc3339(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new().await?);
    let state_clone = state.clone();

    run(service_fn(move |event| {
        let state = state_clone.clone();
        async move { handler(state, event).await }
    }))
    .await
}
