//! Inbound SNS event envelope and signup message extraction.

use serde::Deserialize;
use validator::ValidateEmail;

use crate::{Error, Result};

/// SNS Event wrapper
#[derive(Debug, Deserialize)]
pub struct SnsEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<SnsRecord>,
}

#[derive(Debug, Deserialize)]
pub struct SnsRecord {
    #[serde(rename = "Sns")]
    pub sns: SnsMessage,
}

#[derive(Debug, Deserialize)]
pub struct SnsMessage {
    #[serde(rename = "Message")]
    pub message: String,
}

/// Signup notification carried in the SNS message body.
#[derive(Debug, Deserialize)]
pub struct SignupMessage {
    pub email: String,
}

/// Extract and validate the signup email from an SNS event.
///
/// Only the first record is consulted. Anything that makes the event
/// uninterpretable (no records, unparsable message, missing or syntactically
/// invalid email) is a malformed event, not a transient failure.
pub fn extract_email(event: &SnsEvent) -> Result<String> {
    let record = event
        .records
        .first()
        .ok_or_else(|| Error::MalformedEvent("event has no records".to_string()))?;

    let message: SignupMessage = serde_json::from_str(&record.sns.message)
        .map_err(|e| Error::MalformedEvent(format!("unparsable signup message: {}", e)))?;

    if !message.email.validate_email() {
        return Err(Error::MalformedEvent(format!(
            "not a valid email address: {:?}",
            message.email
        )));
    }

    Ok(message.email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with_message(message: &str) -> SnsEvent {
        SnsEvent {
            records: vec![SnsRecord {
                sns: SnsMessage {
                    message: message.to_string(),
                },
            }],
        }
    }

    #[test]
    fn test_extracts_email_from_first_record() {
        let event = event_with_message(r#"{"email":"user@example.com"}"#);
        assert_eq!(extract_email(&event).unwrap(), "user@example.com");
    }

    #[test]
    fn test_only_first_record_is_consulted() {
        let mut event = event_with_message(r#"{"email":"first@example.com"}"#);
        event.records.push(SnsRecord {
            sns: SnsMessage {
                message: "not json".to_string(),
            },
        });
        assert_eq!(extract_email(&event).unwrap(), "first@example.com");
    }

    #[test]
    fn test_empty_records_is_malformed() {
        let event = SnsEvent { records: vec![] };
        assert!(matches!(
            extract_email(&event),
            Err(Error::MalformedEvent(_))
        ));
    }

    #[test]
    fn test_missing_records_key_deserializes_to_empty() {
        let event: SnsEvent = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            extract_email(&event),
            Err(Error::MalformedEvent(_))
        ));
    }

    #[test]
    fn test_unparsable_message_is_malformed() {
        let event = event_with_message("not json at all");
        assert!(matches!(
            extract_email(&event),
            Err(Error::MalformedEvent(_))
        ));
    }

    #[test]
    fn test_message_without_email_is_malformed() {
        let event = event_with_message(r#"{"user":"someone"}"#);
        assert!(matches!(
            extract_email(&event),
            Err(Error::MalformedEvent(_))
        ));
    }

    #[test]
    fn test_invalid_email_is_malformed() {
        let event = event_with_message(r#"{"email":"not-an-address"}"#);
        assert!(matches!(
            extract_email(&event),
            Err(Error::MalformedEvent(_))
        ));
    }

    #[test]
    fn test_full_envelope_deserializes() {
        let raw = r#"{"Records":[{"Sns":{"Message":"{\"email\":\"user@example.com\"}"}}]}"#;
        let event: SnsEvent = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_email(&event).unwrap(), "user@example.com");
    }
}
