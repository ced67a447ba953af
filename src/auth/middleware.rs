// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request gates applied to the whole router.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/search", get(search))
//!     .layer(middleware::from_fn_with_state(state.clone(), require_authorization))
//!     .layer(middleware::from_fn_with_state(state.clone(), enforce_https));
//! ```

use axum::{
    extract::{Request, State},
    http::{header, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, Permission, SessionIdentity};
use crate::models::User;
use crate::state::AppState;

/// Header set by the TLS-terminating edge.
const FORWARDED_PROTO: &str = "x-forwarded-proto";

/// The user record behind the session, inserted by [`require_authorization`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Swagger UI mount; its assets live below it.
const DOCS_PATH: &str = "/_gateway/docs";

/// Routes reachable without an authorized user.
///
/// Only the gateway's own read-only endpoints are listed under `/_gateway`;
/// any other path there is forwarded and must pass authorization.
pub fn is_public(method: &Method, path: &str) -> bool {
    match path {
        "/api/verify" | "/api/logout" => true,
        _ if method != Method::GET => false,
        "/" | "/_gateway/health" | "/_gateway/openapi.json" | DOCS_PATH => true,
        _ => path.starts_with("/_s/") || is_docs_asset(path),
    }
}

fn is_docs_asset(path: &str) -> bool {
    path.strip_prefix(DOCS_PATH).is_some_and(|rest| rest.starts_with('/'))
}

/// Redirect plain-HTTP requests to HTTPS in production.
pub async fn enforce_https(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.is_prod() {
        return next.run(request).await;
    }
    let via_tls = request
        .headers()
        .get(FORWARDED_PROTO)
        .is_some_and(|v| v.as_bytes() == b"https");
    if via_tls {
        return next.run(request).await;
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default();
    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let target = format!("https://{host}{path}");
    tracing::debug!(%target, "Redirecting to HTTPS");
    (StatusCode::FOUND, [(header::LOCATION, target)]).into_response()
}

/// Resolve the session user and check the method's permission.
///
/// Public routes pass through untouched.
pub async fn require_authorization(
    State(state): State<AppState>,
    SessionIdentity(identity): SessionIdentity,
    mut request: Request,
    next: Next,
) -> Response {
    if is_public(request.method(), request.uri().path()) {
        return next.run(request).await;
    }

    match authorize(&state, identity, request.method()).await {
        Ok(user) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Err(e) => {
            tracing::info!(
                code = e.error_code(),
                required = %Permission::required_for(request.method()),
                method = %request.method(),
                path = request.uri().path(),
                "Access denied"
            );
            e.into_response()
        }
    }
}

async fn authorize(
    state: &AppState,
    identity: Option<String>,
    method: &Method,
) -> Result<User, AuthError> {
    let email = identity.ok_or(AuthError::MissingSession)?;
    let store = state.store.clone();
    let user = tokio::task::spawn_blocking(move || User::find_by_email(store.as_ref(), &email))
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or(AuthError::UnknownUser)?;

    if Permission::required_for(method).granted_to(&user) {
        Ok(user)
    } else {
        Err(AuthError::InsufficientPermissions)
    }
}
