// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed relay assertions.
//!
//! Every forwarded request carrying a session identity gets three headers:
//!
//! | Header | Value |
//! |--------|-------|
//! | `X-LabDB-UserId` | verified identity (email) |
//! | `X-LabDB-Signature` | hex HMAC-SHA-256 over `identity + timestamp` |
//! | `X-LabDB-Signature-Timestamp` | UTC `YYYY-MM-DDTHH:MM:SS` |
//!
//! The downstream application recomputes the HMAC with the shared signing key
//! and rejects stale timestamps. The gateway does not check freshness itself.

use std::fmt;
use std::sync::Arc;

use axum::http::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-labdb-userid");
pub const SIGNATURE_HEADER: HeaderName = HeaderName::from_static("x-labdb-signature");
pub const TIMESTAMP_HEADER: HeaderName = HeaderName::from_static("x-labdb-signature-timestamp");

/// Marker added to every forwarded request; seeing it inbound means a loop.
pub const FORWARDED_MARKER_HEADER: HeaderName = HeaderName::from_static("x-labdb-forwarded");
pub const FORWARDED_MARKER_VALUE: &str = "true";

/// Headers only the gateway may set on a forwarded request.
pub const ASSERTION_HEADERS: [HeaderName; 4] = [
    USER_ID_HEADER,
    SIGNATURE_HEADER,
    TIMESTAMP_HEADER,
    FORWARDED_MARKER_HEADER,
];

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// HMAC signer for relay assertions, keyed by the process signing key.
#[derive(Clone)]
pub struct RelaySigner {
    key: Arc<[u8]>,
}

impl fmt::Debug for RelaySigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelaySigner").finish_non_exhaustive()
    }
}

impl RelaySigner {
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        Self {
            key: Arc::from(key.as_ref()),
        }
    }

    fn mac(&self, identity: &str, timestamp: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC accepts keys of any length");
        mac.update(identity.as_bytes());
        mac.update(timestamp.as_bytes());
        mac
    }

    /// Hex signature over `identity + timestamp`.
    pub fn sign(&self, identity: &str, timestamp: &str) -> String {
        hex::encode(self.mac(identity, timestamp).finalize().into_bytes())
    }

    /// Constant-time check of a hex signature.
    pub fn verify(&self, identity: &str, timestamp: &str, signature: &str) -> bool {
        let Ok(raw) = hex::decode(signature) else {
            return false;
        };
        self.mac(identity, timestamp).verify_slice(&raw).is_ok()
    }

    /// Format `now` the way assertion timestamps are written (second precision).
    pub fn timestamp(now: DateTime<Utc>) -> String {
        now.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Attach the assertion for `identity`, stamped with the current time.
    pub fn add_auth_headers(
        &self,
        identity: &str,
        headers: &mut HeaderMap,
    ) -> Result<(), InvalidHeaderValue> {
        self.add_auth_headers_at(identity, &Self::timestamp(Utc::now()), headers)
    }

    pub fn add_auth_headers_at(
        &self,
        identity: &str,
        timestamp: &str,
        headers: &mut HeaderMap,
    ) -> Result<(), InvalidHeaderValue> {
        let signature = self.sign(identity, timestamp);
        headers.insert(USER_ID_HEADER, HeaderValue::from_str(identity)?);
        headers.insert(SIGNATURE_HEADER, HeaderValue::from_str(&signature)?);
        headers.insert(TIMESTAMP_HEADER, HeaderValue::from_str(timestamp)?);
        tracing::debug!(identity, timestamp, "Attached relay assertion");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // HMAC-SHA-256("k", "alice@example.org2024-01-01T00:00:00")
    const GOLDEN_SIGNATURE: &str =
        "60960876e62b5650dc5301b419a60664c9ac30f58c0ad7843e5e2761c244fa58";

    #[test]
    fn golden_signature() {
        let signer = RelaySigner::new("k");
        assert_eq!(
            signer.sign("alice@example.org", "2024-01-01T00:00:00"),
            GOLDEN_SIGNATURE
        );
    }

    #[test]
    fn development_key_signature() {
        let signer = RelaySigner::new("development-key");
        assert_eq!(
            signer.sign("bob@example.org", "2024-06-30T12:34:56"),
            "6d10032ff355e4398898e55d08a7c9159acd269eccb7c3222277a293834fd67a"
        );
    }

    #[test]
    fn each_input_changes_the_signature() {
        let base = RelaySigner::new("k").sign("alice@example.org", "2024-01-01T00:00:00");
        assert_eq!(
            base,
            RelaySigner::new("k").sign("alice@example.org", "2024-01-01T00:00:00")
        );
        assert_ne!(
            base,
            RelaySigner::new("k2").sign("alice@example.org", "2024-01-01T00:00:00")
        );
        assert_ne!(
            base,
            RelaySigner::new("k").sign("bob@example.org", "2024-01-01T00:00:00")
        );
        assert_ne!(
            base,
            RelaySigner::new("k").sign("alice@example.org", "2024-01-01T00:00:01")
        );
    }

    #[test]
    fn headers_carry_identity_signature_and_timestamp() {
        let signer = RelaySigner::new("k");
        let mut headers = HeaderMap::new();
        signer
            .add_auth_headers_at("alice@example.org", "2024-01-01T00:00:00", &mut headers)
            .unwrap();

        assert_eq!(headers["X-LabDB-UserId"], "alice@example.org");
        assert_eq!(headers["X-LabDB-Signature"], GOLDEN_SIGNATURE);
        assert_eq!(headers["X-LabDB-Signature-Timestamp"], "2024-01-01T00:00:00");
    }

    #[test]
    fn live_headers_verify() {
        let signer = RelaySigner::new("k");
        let mut headers = HeaderMap::new();
        signer.add_auth_headers("alice@example.org", &mut headers).unwrap();

        let ts = headers[TIMESTAMP_HEADER].to_str().unwrap();
        let sig = headers[SIGNATURE_HEADER].to_str().unwrap();
        assert_eq!(ts.len(), "2024-01-01T00:00:00".len());
        assert!(signer.verify("alice@example.org", ts, sig));
        assert!(!RelaySigner::new("other").verify("alice@example.org", ts, sig));
        assert!(!signer.verify("alice@example.org", ts, "not-hex"));
    }

    #[test]
    fn timestamp_truncates_to_seconds() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::milliseconds(999);
        assert_eq!(RelaySigner::timestamp(now), "2024-01-01T00:00:00");
    }

    #[test]
    fn control_characters_in_identity_are_rejected() {
        let mut headers = HeaderMap::new();
        assert!(RelaySigner::new("k")
            .add_auth_headers("bad\nidentity", &mut headers)
            .is_err());
    }
}
