//! Shared library for the signup verification Lambda functions.
//!
//! This crate provides configuration, error types, external-service clients,
//! and the verification request pipeline used by the Lambda binaries.

pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod events;
pub mod processor;
pub mod secrets;
pub mod tracking;
pub mod verification;

pub use config::{Config, CredentialSource};
pub use email::{SendGridMailer, VerificationMailer};
pub use error::{Error, Result};
pub use events::{SnsEvent, SnsMessage, SnsRecord};
pub use processor::{process_signup_event, VerificationPolicy};
pub use secrets::{get_secret, resolve_db_password, resolve_sendgrid_api_key};
pub use tracking::{AttemptStore, PgAttemptStore, VerificationAttempt};
