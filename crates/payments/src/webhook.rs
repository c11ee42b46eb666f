//! Webhook signature verification and event parsing.
//!
//! The processor signs each delivery with a header of the form
//! `t=<unix-seconds>,v1=<hex hmac>` where the MAC is HMAC-SHA256 over
//! `"{t}.{raw body}"` keyed with the shared endpoint secret. Verification
//! must happen on the raw bytes before any state change; a failed check is
//! a 400 at the HTTP layer.

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

use crate::PaymentError;

type HmacSha256 = Hmac<Sha256>;

/// Accepted clock skew between the signature timestamp and now.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Event type emitted when a hosted checkout completes.
pub const EVENT_CHECKOUT_COMPLETED: &str = "checkout.session.completed";

/// A parsed webhook event envelope.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

/// The `data` wrapper around the event object.
#[derive(Debug, Deserialize)]
pub struct EventData {
    pub object: CheckoutSessionObject,
}

/// The checkout-session object carried by a completion event.
#[derive(Debug, Deserialize)]
pub struct CheckoutSessionObject {
    pub id: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    pub customer_details: Option<CustomerDetails>,
}

/// Customer contact details collected on the hosted page.
#[derive(Debug, Deserialize)]
pub struct CustomerDetails {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub name: Option<String>,
}

/// Verify a signature header against the raw payload.
///
/// `now` is the caller's clock in Unix seconds; deliveries whose timestamp
/// is more than [`SIGNATURE_TOLERANCE_SECS`] away are rejected to limit
/// replay windows. The MAC comparison is constant-time via
/// [`Mac::verify_slice`].
pub fn verify_signature(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), PaymentError> {
    let (timestamp, signatures) = parse_header(header)?;

    if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(PaymentError::InvalidSignature(
            "timestamp outside tolerance".into(),
        ));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| PaymentError::InvalidSignature("invalid secret".into()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    // A delivery may carry multiple v1 entries during secret rotation;
    // any one matching is sufficient.
    for signature in &signatures {
        let Some(expected) = decode_hex(signature) else {
            continue;
        };
        if mac.clone().verify_slice(&expected).is_ok() {
            return Ok(());
        }
    }

    Err(PaymentError::InvalidSignature(
        "no matching v1 signature".into(),
    ))
}

/// Parse and verify a delivery in one step, returning the typed event.
pub fn parse_event(
    payload: &[u8],
    header: &str,
    secret: &str,
    now: i64,
) -> Result<WebhookEvent, PaymentError> {
    verify_signature(payload, header, secret, now)?;
    Ok(serde_json::from_slice(payload)?)
}

/// Split the header into its timestamp and `v1` signature values.
fn parse_header(header: &str) -> Result<(i64, Vec<String>), PaymentError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = value.parse::<i64>().ok();
            }
            Some(("v1", value)) => {
                signatures.push(value.to_string());
            }
            _ => {}
        }
    }

    let timestamp = timestamp
        .ok_or_else(|| PaymentError::InvalidSignature("missing or invalid timestamp".into()))?;
    if signatures.is_empty() {
        return Err(PaymentError::InvalidSignature("missing v1 signature".into()));
    }

    Ok((timestamp, signatures))
}

/// Decode a lowercase/uppercase hex string; `None` on any invalid digit.
fn decode_hex(input: &str) -> Option<Vec<u8>> {
    if input.len() % 2 != 0 {
        return None;
    }
    (0..input.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&input[i..i + 2], 16).ok())
        .collect()
}

/// Hex-encode a MAC for building signature headers (tests, fixtures).
pub fn encode_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Build a valid signature header for `payload` (test/fixture helper).
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let signature = encode_hex(&mac.finalize().into_bytes());
    format!("t={timestamp},v1={signature}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test_secret";
    const PAYLOAD: &[u8] = br#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{"id":"cs_1","metadata":{"order_id":"42"}}}}"#;

    #[test]
    fn valid_signature_is_accepted() {
        let now = 1_700_000_000;
        let header = sign_payload(PAYLOAD, SECRET, now);
        assert!(verify_signature(PAYLOAD, &header, SECRET, now).is_ok());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let now = 1_700_000_000;
        let header = sign_payload(PAYLOAD, "whsec_other", now);
        assert!(verify_signature(PAYLOAD, &header, SECRET, now).is_err());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let now = 1_700_000_000;
        let header = sign_payload(PAYLOAD, SECRET, now);
        let tampered = br#"{"id":"evt_1","type":"checkout.session.completed","data":{"object":{"id":"cs_1","metadata":{"order_id":"43"}}}}"#;
        assert!(verify_signature(tampered, &header, SECRET, now).is_err());
    }

    #[test]
    fn stale_timestamp_is_rejected() {
        let now = 1_700_000_000;
        let header = sign_payload(PAYLOAD, SECRET, now - SIGNATURE_TOLERANCE_SECS - 1);
        assert!(verify_signature(PAYLOAD, &header, SECRET, now).is_err());
    }

    #[test]
    fn timestamp_at_tolerance_boundary_is_accepted() {
        let now = 1_700_000_000;
        let header = sign_payload(PAYLOAD, SECRET, now - SIGNATURE_TOLERANCE_SECS);
        assert!(verify_signature(PAYLOAD, &header, SECRET, now).is_ok());
    }

    #[test]
    fn malformed_header_is_rejected() {
        let now = 1_700_000_000;
        assert!(verify_signature(PAYLOAD, "", SECRET, now).is_err());
        assert!(verify_signature(PAYLOAD, "t=abc,v1=00", SECRET, now).is_err());
        assert!(verify_signature(PAYLOAD, "t=1700000000", SECRET, now).is_err());
    }

    #[test]
    fn rotation_header_with_extra_signature_still_matches() {
        let now = 1_700_000_000;
        let valid = sign_payload(PAYLOAD, SECRET, now);
        let header = format!("{valid},v1=deadbeef");
        assert!(verify_signature(PAYLOAD, &header, SECRET, now).is_ok());
    }

    #[test]
    fn parse_event_returns_typed_envelope() {
        let now = 1_700_000_000;
        let header = sign_payload(PAYLOAD, SECRET, now);
        let event = parse_event(PAYLOAD, &header, SECRET, now).unwrap();

        assert_eq!(event.event_type, EVENT_CHECKOUT_COMPLETED);
        assert_eq!(event.data.object.id, "cs_1");
        assert_eq!(
            event.data.object.metadata.get("order_id").map(String::as_str),
            Some("42")
        );
    }

    #[test]
    fn hex_round_trip() {
        let bytes = [0x00, 0x7f, 0xff, 0x10];
        assert_eq!(decode_hex(&encode_hex(&bytes)).unwrap(), bytes);
        assert!(decode_hex("xyz").is_none());
        assert!(decode_hex("abc").is_none());
    }
}
