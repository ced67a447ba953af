// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use crate::auth::{session_key, IdentityVerifier, RelaySigner};
use crate::config::Config;
use crate::storage::RecordStore;

/// Timeout for a single forwarded request.
const FORWARD_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn RecordStore>,
    pub signer: RelaySigner,
    pub verifier: IdentityVerifier,
    /// Client for downstream forwarding. Never follows redirects.
    pub http: reqwest::Client,
    pub session_key: Key,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RecordStore>) -> Self {
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(FORWARD_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            signer: RelaySigner::new(&config.signing_key),
            verifier: IdentityVerifier::new(&config.verify_url, &config.client_id),
            session_key: session_key(&config.session_secret),
            config: Arc::new(config),
            store,
            http,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.session_key.clone()
    }
}
