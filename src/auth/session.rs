// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Browser sessions in a signed cookie.
//!
//! The cookie value is `identity|issued_at_unix`, signed with a key derived
//! from `SECRET_TOKEN`. Tampered, malformed or expired cookies read as an
//! anonymous session.
//!
//! ```rust,ignore
//! async fn handler(SessionIdentity(identity): SessionIdentity) -> impl IntoResponse {
//!     // identity: Option<String>
//! }
//! ```

use std::convert::Infallible;
use std::time::Duration;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha512};

use crate::state::AppState;

pub const SESSION_COOKIE: &str = "labdb_session";

/// Derive the cookie signing key from the configured secret.
pub fn session_key(secret: &str) -> Key {
    let digest = Sha512::digest(secret.as_bytes());
    Key::from(digest.as_slice())
}

fn encode_session(identity: &str, issued_at: DateTime<Utc>) -> String {
    format!("{identity}|{}", issued_at.timestamp())
}

fn decode_session(value: &str, ttl: Duration, now: DateTime<Utc>) -> Option<String> {
    let (identity, issued) = value.rsplit_once('|')?;
    let issued: i64 = issued.parse().ok()?;
    let age = now.timestamp().checked_sub(issued)?;
    if identity.is_empty() || age < 0 || age as u64 > ttl.as_secs() {
        return None;
    }
    Some(identity.to_string())
}

/// Identity recorded in the session, if any.
pub fn read_identity(jar: &SignedCookieJar, ttl: Duration, now: DateTime<Utc>) -> Option<String> {
    let cookie = jar.get(SESSION_COOKIE)?;
    decode_session(cookie.value(), ttl, now)
}

/// Record `identity` in a fresh session cookie.
pub fn start_session(jar: SignedCookieJar, identity: &str, secure: bool) -> SignedCookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, encode_session(identity, Utc::now())))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure);
    jar.add(cookie)
}

pub fn end_session(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

/// Extractor for the session identity. Never rejects; anonymous is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity(pub Option<String>);

impl FromRequestParts<AppState> for SessionIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = SignedCookieJar::from_headers(&parts.headers, state.session_key.clone());
        Ok(SessionIdentity(read_identity(
            &jar,
            state.config.session_ttl,
            Utc::now(),
        )))
    }
}
