//! Tracking records for issued verification attempts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::{Error, Result};

/// One issued verification attempt. Created once per inbound event and
/// never updated or deleted by this component.
#[derive(Debug, Clone)]
pub struct VerificationAttempt {
    pub email: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Persists verification attempts.
#[async_trait]
pub trait AttemptStore: Send + Sync {
    async fn record_attempt(&self, attempt: &VerificationAttempt) -> Result<()>;
}

/// Postgres-backed attempt store writing to the `email_tracking` table.
pub struct PgAttemptStore {
    pool: PgPool,
}

impl PgAttemptStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttemptStore for PgAttemptStore {
    async fn record_attempt(&self, attempt: &VerificationAttempt) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO email_tracking (email, token, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&attempt.email)
        .bind(&attempt.token)
        .bind(attempt.expires_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        info!(email = %attempt.email, "Verification attempt recorded");
        Ok(())
    }
}
