/// Identity lifecycle webhook verification and payloads
///
/// The identity provider pushes user lifecycle events (`user.created`,
/// `user.updated`, `user.deleted`) to Corkboard over a signed webhook.
/// Signatures follow the common timestamped-HMAC scheme: the header
///
/// ```text
/// X-Identity-Signature: t=<unix seconds>,v1=<hex hmac-sha256>
/// ```
///
/// carries the signing timestamp and one or more `v1` signatures computed
/// over `"{t}.{raw body}"` with the shared webhook secret. Verification
/// rejects stale timestamps to bound replay, and accepts the payload when
/// any `v1` entry verifies.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the webhook signature
pub const SIGNATURE_HEADER: &str = "x-identity-signature";

/// Maximum accepted age/skew of the signing timestamp (seconds)
pub const DEFAULT_TOLERANCE_SECONDS: i64 = 300;

/// Error type for webhook verification
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The signature header is missing
    #[error("missing signature header")]
    MissingSignature,

    /// The signature header does not parse
    #[error("malformed signature header")]
    MalformedSignature,

    /// The signing timestamp is outside the tolerance window
    #[error("signature timestamp outside tolerance")]
    StaleTimestamp,

    /// No signature entry verified against the payload
    #[error("signature verification failed")]
    InvalidSignature,
}

/// Identity lifecycle event payloads
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum LifecycleEvent {
    /// A user was created at the provider
    #[serde(rename = "user.created")]
    UserCreated(UserPayload),

    /// A user's profile changed at the provider
    #[serde(rename = "user.updated")]
    UserUpdated(UserPayload),

    /// A user was deleted at the provider
    #[serde(rename = "user.deleted")]
    UserDeleted(DeletedPayload),
}

/// User data carried by created/updated events
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    /// The provider's stable user id
    pub id: String,

    /// Display name
    pub name: Option<String>,

    /// Email address
    pub email: String,
}

/// Payload of a deletion event
#[derive(Debug, Clone, Deserialize)]
pub struct DeletedPayload {
    /// The provider's stable user id
    pub id: String,
}

/// Computes the signature header value for a payload
///
/// Used by tests and by provider simulators; the production sender is the
/// identity provider itself.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let signature = hex::encode(mac.finalize().into_bytes());

    format!("t={},v1={}", timestamp, signature)
}

/// Verifies a webhook signature header against the raw payload
///
/// # Arguments
///
/// * `secret` - The shared webhook secret
/// * `header` - The `X-Identity-Signature` header value
/// * `payload` - The raw (unparsed) request body
/// * `now` - Current time, for timestamp tolerance
/// * `tolerance_seconds` - Maximum accepted timestamp age/skew
///
/// # Errors
///
/// Returns an error if the header is malformed, the timestamp is outside
/// the tolerance window, or no signature entry verifies
pub fn verify_signature(
    secret: &str,
    header: &str,
    payload: &[u8],
    now: DateTime<Utc>,
    tolerance_seconds: i64,
) -> Result<(), WebhookError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for entry in header.split(',') {
        match entry.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(value.parse().map_err(|_| WebhookError::MalformedSignature)?);
            }
            Some(("v1", value)) => signatures.push(value),
            // Unknown schemes are ignored for forward compatibility
            Some(_) => {}
            None => return Err(WebhookError::MalformedSignature),
        }
    }

    let timestamp = timestamp.ok_or(WebhookError::MalformedSignature)?;
    if signatures.is_empty() {
        return Err(WebhookError::MalformedSignature);
    }

    if (now.timestamp() - timestamp).abs() > tolerance_seconds {
        return Err(WebhookError::StaleTimestamp);
    }

    for signature in signatures {
        let Ok(expected) = hex::decode(signature) else {
            continue;
        };

        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);

        if mac.verify_slice(&expected).is_ok() {
            return Ok(());
        }
    }

    Err(WebhookError::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";

    #[test]
    fn test_sign_and_verify_roundtrip() {
        let now = Utc::now();
        let payload = br#"{"type":"user.created","data":{"id":"user_1","name":null,"email":"a@b.c"}}"#;
        let header = sign_payload(SECRET, now.timestamp(), payload);

        assert!(verify_signature(SECRET, &header, payload, now, DEFAULT_TOLERANCE_SECONDS).is_ok());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let now = Utc::now();
        let header = sign_payload(SECRET, now.timestamp(), b"original");

        assert!(matches!(
            verify_signature(SECRET, &header, b"tampered", now, DEFAULT_TOLERANCE_SECONDS),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let now = Utc::now();
        let header = sign_payload("other_secret", now.timestamp(), b"payload");

        assert!(matches!(
            verify_signature(SECRET, &header, b"payload", now, DEFAULT_TOLERANCE_SECONDS),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let now = Utc::now();
        let old = now.timestamp() - DEFAULT_TOLERANCE_SECONDS - 1;
        let header = sign_payload(SECRET, old, b"payload");

        assert!(matches!(
            verify_signature(SECRET, &header, b"payload", now, DEFAULT_TOLERANCE_SECONDS),
            Err(WebhookError::StaleTimestamp)
        ));
    }

    #[test]
    fn test_malformed_header_rejected() {
        let now = Utc::now();

        for header in ["", "garbage", "t=notanumber,v1=aa", "v1=aa", "t=123"] {
            assert!(
                verify_signature(SECRET, header, b"payload", now, DEFAULT_TOLERANCE_SECONDS)
                    .is_err(),
                "header {:?} should be rejected",
                header
            );
        }
    }

    #[test]
    fn test_lifecycle_event_parsing() {
        let created: LifecycleEvent = serde_json::from_str(
            r#"{"type":"user.created","data":{"id":"user_1","name":"Ada","email":"ada@example.com"}}"#,
        )
        .unwrap();
        assert!(matches!(created, LifecycleEvent::UserCreated(ref p) if p.id == "user_1"));

        let deleted: LifecycleEvent =
            serde_json::from_str(r#"{"type":"user.deleted","data":{"id":"user_1"}}"#).unwrap();
        assert!(matches!(deleted, LifecycleEvent::UserDeleted(ref p) if p.id == "user_1"));
    }
}
