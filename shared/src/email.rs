//! Transactional email dispatch via the SendGrid v3 Mail Send API.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use crate::{Error, Result};

const SENDGRID_SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

const SUBJECT: &str = "Verify Your Email";

/// Dispatches verification emails. The processing pipeline only sees this
/// trait, so tests can substitute an in-memory fake.
#[async_trait]
pub trait VerificationMailer: Send + Sync {
    /// Send a verification email containing `link` to `to_email`.
    async fn send_verification(&self, to_email: &str, link: &str, ttl_secs: i64) -> Result<()>;
}

/// SendGrid-backed mailer.
pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: String,
    from_email: String,
}

impl SendGridMailer {
    pub fn new(api_key: String, from_email: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from_email,
        }
    }
}

/// Render the HTML body with the link and a human-readable expiry notice.
pub fn render_body(link: &str, ttl_secs: i64) -> String {
    format!(
        r#"
        <!DOCTYPE html>
        <html>
        <head><meta charset="UTF-8"></head>
        <body style="font-family: sans-serif; padding: 20px;">
            <h2>Verify Your Email</h2>
            <p>Click the link below to verify your email address:</p>
            <p><a href="{}">{}</a></p>
            <hr>
            <p style="color: #666; font-size: 12px;">
                This link expires in {}.
            </p>
        </body>
        </html>
        "#,
        link,
        link,
        describe_window(ttl_secs)
    )
}

fn describe_window(ttl_secs: i64) -> String {
    if ttl_secs % 60 == 0 {
        let minutes = ttl_secs / 60;
        if minutes == 1 {
            "1 minute".to_string()
        } else {
            format!("{} minutes", minutes)
        }
    } else {
        format!("{} seconds", ttl_secs)
    }
}

/// Build the SendGrid v3 request payload.
pub fn build_payload(from_email: &str, to_email: &str, html: &str) -> Value {
    json!({
        "personalizations": [{ "to": [{ "email": to_email }] }],
        "from": { "email": from_email },
        "subject": SUBJECT,
        "content": [{ "type": "text/html", "value": html }],
    })
}

#[async_trait]
impl VerificationMailer for SendGridMailer {
    async fn send_verification(&self, to_email: &str, link: &str, ttl_secs: i64) -> Result<()> {
        let payload = build_payload(&self.from_email, to_email, &render_body(link, ttl_secs));

        let response = self
            .client
            .post(SENDGRID_SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::EmailDelivery(format!("Failed to reach SendGrid: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::EmailDelivery(format!(
                "SendGrid rejected the send: {} {}",
                status, body
            )));
        }

        info!(to = %to_email, "Verification email dispatched");
        Ok(())
    }
}
