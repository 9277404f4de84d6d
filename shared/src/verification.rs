//! Verification token, expiry, and link generation.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::OsRng;
use rand::RngCore;

/// A freshly generated set of verification credentials for one request.
#[derive(Debug, Clone)]
pub struct VerificationCredentials {
    /// Hex-encoded CSPRNG token
    pub token: String,
    /// Moment after which the token must be treated as invalid
    pub expires_at: DateTime<Utc>,
    /// Full verification link to embed in the email
    pub link: String,
}

/// Generate a fresh hex token of `token_bytes` random bytes.
///
/// Uniqueness is probabilistic; nothing downstream enforces it.
pub fn generate_token(token_bytes: usize) -> String {
    let mut buf = vec![0u8; token_bytes];
    OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

/// Build the verification link for a given domain, email, and token.
pub fn build_link(domain: &str, email: &str, token: &str) -> String {
    format!(
        "http://{}/verify?email={}&token={}",
        domain,
        urlencoding::encode(email),
        token
    )
}

/// Generate token, expiry, and link for one verification request.
pub fn generate_credentials(
    domain: &str,
    email: &str,
    token_bytes: usize,
    ttl_secs: i64,
) -> VerificationCredentials {
    let token = generate_token(token_bytes);
    let link = build_link(domain, email, &token);
    VerificationCredentials {
        link,
        expires_at: Utc::now() + Duration::seconds(ttl_secs),
        token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_hex_of_configured_length() {
        for bytes in [16, 20] {
            let token = generate_token(bytes);
            assert_eq!(token.len(), bytes * 2);
            assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_tokens_are_fresh_per_request() {
        assert_ne!(generate_token(16), generate_token(16));
    }

    #[test]
    fn test_link_is_deterministic_and_url_encoded() {
        let link = build_link("example.org", "user@example.com", "abc123");
        assert_eq!(
            link,
            "http://example.org/verify?email=user%40example.com&token=abc123"
        );
    }

    #[test]
    fn test_link_encodes_plus_addressing() {
        let link = build_link("example.org", "user+tag@example.com", "ff");
        assert_eq!(
            link,
            "http://example.org/verify?email=user%2Btag%40example.com&token=ff"
        );
    }

    #[test]
    fn test_expiry_is_now_plus_window() {
        let before = Utc::now();
        let creds = generate_credentials("example.org", "user@example.com", 16, 120);
        let after = Utc::now();

        assert!(creds.expires_at >= before + Duration::seconds(120));
        assert!(creds.expires_at <= after + Duration::seconds(120));
    }

    #[test]
    fn test_credentials_embed_their_own_token() {
        let creds = generate_credentials("example.org", "user@example.com", 16, 120);
        assert!(creds.link.ends_with(&format!("&token={}", creds.token)));
    }
}
