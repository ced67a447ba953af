// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// The variants exist for logging. Every authentication or authorization
/// failure renders the same `403 Forbidden` body so callers cannot tell the
/// reasons apart.
#[derive(Debug)]
pub enum AuthError {
    /// No session identity on a protected route
    MissingSession,
    /// Session identity has no user record
    UnknownUser,
    /// User lacks the permission the method requires
    InsufficientPermissions,
    /// Identity token could not be verified
    VerificationFailed,
    /// Store or runtime failure while authorizing
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
}

impl AuthError {
    /// Get the error code for this error (logs only).
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingSession => "missing_session",
            AuthError::UnknownUser => "unknown_user",
            AuthError::InsufficientPermissions => "insufficient_permissions",
            AuthError::VerificationFailed => "verification_failed",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::FORBIDDEN,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingSession => write!(f, "No session identity"),
            AuthError::UnknownUser => write!(f, "Session identity has no user record"),
            AuthError::InsufficientPermissions => {
                write!(f, "Insufficient permissions for this operation")
            }
            AuthError::VerificationFailed => write!(f, "Identity token verification failed"),
            AuthError::Internal(msg) => write!(f, "Internal authorization error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = if status == StatusCode::FORBIDDEN {
            "Forbidden"
        } else {
            "Internal server error"
        };
        (status, Json(AuthErrorBody { error })).into_response()
    }
}
