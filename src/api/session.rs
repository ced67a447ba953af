// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login (token verification) and logout.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::{end_session, start_session, AuthError};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct VerifyParams {
    /// ID token issued by the identity provider.
    pub token: Option<String>,
}

/// Exchange an identity token for a session.
#[utoipa::path(
    post,
    path = "/api/verify",
    tag = "Session",
    params(VerifyParams),
    responses(
        (status = 303, description = "Session started, redirect to /"),
        (status = 403, description = "Token rejected", body = crate::error::ErrorBody)
    )
)]
pub async fn verify(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Query(params): Query<VerifyParams>,
) -> Response {
    let token = params.token.unwrap_or_default();
    if token.is_empty() {
        return AuthError::VerificationFailed.into_response();
    }

    match state.verifier.verified_identity(&token).await {
        Some(identity) => {
            tracing::info!(%identity, "Session started");
            let jar = start_session(jar, &identity, state.config.is_prod());
            (jar, Redirect::to("/")).into_response()
        }
        None => AuthError::VerificationFailed.into_response(),
    }
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/logout",
    tag = "Session",
    responses((status = 303, description = "Session cleared, redirect to /"))
)]
pub async fn logout(jar: SignedCookieJar) -> impl IntoResponse {
    (end_session(jar), Redirect::to("/"))
}
