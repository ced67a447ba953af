// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! External identity-token verification.
//!
//! The browser hands us an ID token issued by the identity provider; we ask the
//! provider's token-info endpoint to vouch for it. A token is accepted only if
//! the endpoint answers 200, the email is marked verified and the audience
//! contains our registered client id.
//!
//! Any failure yields `None`. Callers treat that as an authentication failure
//! and never reveal the reason.

use std::time::Duration;

use axum::http::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;

/// Request timeout for the token-info endpoint.
const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Fields of the token-info response we rely on.
#[derive(Debug, Default, Deserialize)]
struct TokenInfo {
    #[serde(default)]
    aud: String,
    #[serde(default)]
    email_verified: Value,
    #[serde(default)]
    email: String,
}

/// Verifies identity tokens against the provider's token-info endpoint.
#[derive(Clone)]
pub struct IdentityVerifier {
    verify_url: String,
    client_id: String,
    client: reqwest::Client,
}

impl IdentityVerifier {
    pub fn new(verify_url: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            verify_url: verify_url.into(),
            client_id: client_id.into(),
            client: reqwest::Client::builder()
                .timeout(VERIFY_TIMEOUT)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Exchange `token` for a verified email, or `None`.
    pub async fn verified_identity(&self, token: &str) -> Option<String> {
        let url = format!("{}?id_token={}", self.verify_url, urlencoding::encode(token));

        let response = match self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "text/plain")
            .body("")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Identity verification request failed");
                return None;
            }
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::warn!(%status, "Identity verification rejected token");
            return None;
        }

        let info: TokenInfo = match response.json().await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(error = %e, "Identity verification returned malformed body");
                return None;
            }
        };

        let identity = self.accept(info);
        if identity.is_none() {
            tracing::warn!("Identity token failed audience or email checks");
        }
        identity
    }

    fn accept(&self, info: TokenInfo) -> Option<String> {
        let verified = match &info.email_verified {
            Value::String(s) => s == "true",
            Value::Bool(b) => *b,
            _ => false,
        };
        // Substring match on the audience, as the provider may return a list.
        if verified && info.aud.contains(&self.client_id) && !info.email.is_empty() {
            Some(info.email)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Query,
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::post,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    const CLIENT_ID: &str = "client-123.apps.example.com";

    fn info(aud: &str, verified: Value, email: &str) -> TokenInfo {
        TokenInfo {
            aud: aud.to_string(),
            email_verified: verified,
            email: email.to_string(),
        }
    }

    #[test]
    fn accepts_verified_email_with_matching_audience() {
        let v = IdentityVerifier::new("http://unused", CLIENT_ID);
        assert_eq!(
            v.accept(info(CLIENT_ID, json!("true"), "alice@example.org")),
            Some("alice@example.org".to_string())
        );
        assert_eq!(
            v.accept(info(
                &format!("prefix-{CLIENT_ID}-suffix"),
                json!(true),
                "alice@example.org"
            )),
            Some("alice@example.org".to_string())
        );
    }

    #[test]
    fn rejects_unverified_or_foreign_tokens() {
        let v = IdentityVerifier::new("http://unused", CLIENT_ID);
        assert!(v
            .accept(info(CLIENT_ID, json!("false"), "alice@example.org"))
            .is_none());
        assert!(v
            .accept(info(CLIENT_ID, Value::Null, "alice@example.org"))
            .is_none());
        assert!(v
            .accept(info("someone-else", json!("true"), "alice@example.org"))
            .is_none());
        assert!(v.accept(info(CLIENT_ID, json!("true"), "")).is_none());
    }

    async fn tokeninfo(Query(params): Query<HashMap<String, String>>) -> Response {
        match params.get("id_token").map(String::as_str) {
            Some("good token") => Json(json!({
                "aud": CLIENT_ID,
                "email_verified": "true",
                "email": "alice@example.org",
            }))
            .into_response(),
            Some("wrong-aud") => Json(json!({
                "aud": "other",
                "email_verified": "true",
                "email": "alice@example.org",
            }))
            .into_response(),
            _ => (StatusCode::BAD_REQUEST, "invalid_token").into_response(),
        }
    }

    async fn spawn_tokeninfo() -> String {
        let app = Router::new().route("/tokeninfo", post(tokeninfo));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/tokeninfo")
    }

    #[tokio::test]
    async fn verifies_against_endpoint() {
        let url = spawn_tokeninfo().await;
        let v = IdentityVerifier::new(url, CLIENT_ID);

        assert_eq!(
            v.verified_identity("good token").await.as_deref(),
            Some("alice@example.org")
        );
        assert!(v.verified_identity("wrong-aud").await.is_none());
        assert!(v.verified_identity("expired").await.is_none());
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_failure() {
        let v = IdentityVerifier::new("http://127.0.0.1:1/tokeninfo", CLIENT_ID);
        assert!(v.verified_identity("good token").await.is_none());
    }
}
