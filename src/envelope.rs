//! Envelope Module
//!
//! Persisted form of a cache entry: the contract-encoded payload plus
//! its expiration metadata. Serialized as UTF-8 JSON, one object per
//! file in the file tier:
//!
//! ```json
//! {
//!   "value": { "shape": "text_list", "data": ["svcA", "svcB"] },
//!   "absoluteExpiration": "2026-08-31T12:00:00Z",
//!   "slidingExpiration": null
//! }
//! ```
//!
//! `slidingExpiration` is part of the format but is never enforced;
//! expiry is driven solely by the absolute timestamp.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// == Envelope ==
/// On-disk wrapper combining a payload with its expiration metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Contract-encoded payload
    pub value: JsonValue,
    /// Instant at or past which the entry is dead (ISO-8601, UTC)
    #[serde(default)]
    pub absolute_expiration: Option<DateTime<Utc>>,
    /// Carried for format compatibility, not enforced
    #[serde(default)]
    pub sliding_expiration: Option<Duration>,
}

impl Envelope {
    // == Constructor ==
    /// Wraps a payload, stamping the absolute expiration from `ttl`
    /// measured against the current UTC time. No `ttl` means the entry
    /// never expires on its own.
    pub fn new(value: JsonValue, ttl: Option<Duration>) -> Self {
        let absolute_expiration = ttl.and_then(|ttl| {
            // A ttl too large for the calendar is treated as "never expires"
            chrono::Duration::from_std(ttl)
                .ok()
                .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        });

        Self {
            value,
            absolute_expiration,
            sliding_expiration: None,
        }
    }

    // == Is Expired ==
    /// Whether the entry is dead at `now`.
    ///
    /// Boundary condition: an entry is expired once `now` is at or past
    /// the absolute expiration. Entries without one never expire.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.absolute_expiration {
            Some(expires_at) => now >= expires_at,
            None => false,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_no_ttl_never_expires() {
        let envelope = Envelope::new(json!("v"), None);

        assert!(envelope.absolute_expiration.is_none());
        assert!(!envelope.is_expired(Utc::now() + chrono::Duration::days(365)));
    }

    #[test]
    fn test_envelope_with_ttl_sets_absolute_expiration() {
        let before = Utc::now();
        let envelope = Envelope::new(json!("v"), Some(Duration::from_secs(3600)));
        let expires_at = envelope.absolute_expiration.unwrap();

        assert!(expires_at >= before + chrono::Duration::seconds(3600));
        assert!(expires_at <= Utc::now() + chrono::Duration::seconds(3600));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Utc::now();
        let envelope = Envelope {
            value: json!("v"),
            absolute_expiration: Some(now),
            sliding_expiration: None,
        };

        // Expired exactly at the boundary
        assert!(envelope.is_expired(now));
        assert!(!envelope.is_expired(now - chrono::Duration::milliseconds(1)));
    }

    #[test]
    fn test_envelope_json_field_names() {
        let envelope = Envelope::new(json!({"shape": "text", "data": "v"}), None);
        let json = serde_json::to_value(&envelope).unwrap();

        assert!(json.get("value").is_some());
        assert!(json.get("absoluteExpiration").is_some());
        assert!(json.get("slidingExpiration").is_some());
    }

    #[test]
    fn test_envelope_parses_without_expiration_fields() {
        let raw = r#"{ "value": "bare" }"#;
        let envelope: Envelope = serde_json::from_str(raw).unwrap();

        assert!(envelope.absolute_expiration.is_none());
        assert!(envelope.sliding_expiration.is_none());
    }

    #[test]
    fn test_envelope_roundtrip_preserves_expiration() {
        let envelope = Envelope::new(json!("v"), Some(Duration::from_secs(60)));
        let raw = serde_json::to_string(&envelope).unwrap();
        let parsed: Envelope = serde_json::from_str(&raw).unwrap();

        assert_eq!(
            parsed.absolute_expiration,
            envelope.absolute_expiration
        );
    }

    #[test]
    fn test_oversized_ttl_means_no_expiration() {
        let envelope = Envelope::new(json!("v"), Some(Duration::from_secs(u64::MAX)));

        assert!(envelope.absolute_expiration.is_none());
    }
}
