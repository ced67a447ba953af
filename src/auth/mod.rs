// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Browser sessions, identity verification and the signed relay assertion
//! that lets the downstream application trust the caller's identity.
//!
//! ## Auth Flow
//!
//! 1. The login page obtains an ID token from the identity provider
//! 2. Browser sends `POST /api/verify?token=<id token>`
//! 3. Gateway:
//!    - Verifies the token with the provider's token-info endpoint
//!    - Stores the verified email in a signed session cookie
//! 4. On every later request the session email is resolved to a user record
//!    and checked against the method (`GET` needs read, anything else write)
//! 5. Forwarded requests carry `X-LabDB-UserId`, `X-LabDB-Signature` and
//!    `X-LabDB-Signature-Timestamp`
//!
//! ## Security
//!
//! - Authentication and authorization failures are all `403 Forbidden`
//! - Inbound copies of the assertion headers are always stripped
//! - Production requests arriving without TLS are redirected to HTTPS

pub mod error;
pub mod middleware;
pub mod roles;
pub mod session;
pub mod signer;
pub mod verifier;

pub use error::AuthError;
pub use middleware::{enforce_https, require_authorization, CurrentUser};
pub use roles::Permission;
pub use session::{end_session, session_key, start_session, SessionIdentity};
pub use signer::RelaySigner;
pub use verifier::IdentityVerifier;
