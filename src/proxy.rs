// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Downstream Forwarding
//!
//! Requests the gateway does not answer itself are relayed to the downstream
//! application. Before forwarding:
//!
//! 1. A request already carrying `X-Labdb-Forwarded` is refused (loop guard)
//! 2. Spoofable headers are stripped: any `cf-*` edge header,
//!    `X-Forwarded-For`, `Forwarded`, `X-Forwarded-Host`, `Host`, inbound
//!    relay assertion headers and hop-by-hop headers
//! 3. `X-Labdb-Forwarded: true` is added, plus the signed relay assertion when
//!    the session has an identity
//!
//! The origin's status, headers and body are relayed back unchanged. Origin
//! redirects are passed through, not followed.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{
        header::{self, HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue},
        StatusCode,
    },
    response::{IntoResponse, Response},
};

use crate::auth::signer::{ASSERTION_HEADERS, FORWARDED_MARKER_HEADER, FORWARDED_MARKER_VALUE};
use crate::auth::SessionIdentity;
use crate::config::Config;
use crate::error::ApiError;
use crate::state::AppState;

/// Largest request body relayed downstream.
const MAX_FORWARD_BODY: usize = 64 * 1024 * 1024;

/// Prefix of headers set by the trusted edge network.
const EDGE_HEADER_PREFIX: &str = "cf-";

const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

const KEEP_ALIVE: HeaderName = HeaderName::from_static("keep-alive");
const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Stuck in a recursive proxy loop.")]
    Loop,

    #[error("Host {0:?} is not served by this gateway")]
    UnknownHost(String),

    #[error("Invalid downstream target: {0}")]
    BadTarget(String),

    #[error("Request body could not be read")]
    Body,

    #[error("Invalid relay identity: {0}")]
    Assertion(#[from] InvalidHeaderValue),

    #[error("Downstream timed out")]
    Timeout,

    #[error("Downstream unreachable")]
    Transport(#[source] reqwest::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Loop | ProxyError::UnknownHost(_) | ProxyError::Body => {
                StatusCode::BAD_REQUEST
            }
            ProxyError::Assertion(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::BadTarget(_) | ProxyError::Transport(_) => StatusCode::BAD_GATEWAY,
            ProxyError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyError::Timeout
        } else {
            ProxyError::Transport(err)
        }
    }
}

/// Base URL (scheme and authority) of the downstream origin for a request.
///
/// In production the public host suffix is swapped for the backend suffix
/// and HTTPS is used. In development the configured target is used as-is,
/// defaulting to plain HTTP.
pub fn backend_base(config: &Config, host: Option<&str>) -> Result<url::Url, ProxyError> {
    let raw = if config.is_prod() {
        let host = host.unwrap_or_default();
        let name = host.split(':').next().unwrap_or_default();
        let prefix = name
            .strip_suffix(config.public_suffix.as_str())
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ProxyError::UnknownHost(host.to_string()))?;
        format!("https://{prefix}{}", config.backend_suffix)
    } else if config.proxy_target.contains("://") {
        config.proxy_target.clone()
    } else {
        format!("http://{}", config.proxy_target)
    };
    url::Url::parse(&raw).map_err(|e| ProxyError::BadTarget(e.to_string()))
}

/// Remove every header a caller could use to impersonate an edge proxy or a
/// previous relay hop.
pub fn strip_inbound_headers(headers: &mut HeaderMap) {
    // Headers listed in `Connection` are hop-by-hop too.
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    let edge: Vec<HeaderName> = headers
        .keys()
        .filter(|name| name.as_str().starts_with(EDGE_HEADER_PREFIX))
        .cloned()
        .collect();

    let fixed = [
        header::HOST,
        header::FORWARDED,
        header::CONTENT_LENGTH,
        X_FORWARDED_FOR,
        X_FORWARDED_HOST,
        KEEP_ALIVE,
    ];

    for name in listed
        .iter()
        .chain(edge.iter())
        .chain(fixed.iter())
        .chain(HOP_BY_HOP.iter())
        .chain(ASSERTION_HEADERS.iter())
    {
        headers.remove(name);
    }
}

fn has_loop_marker(headers: &HeaderMap) -> bool {
    headers.contains_key(FORWARDED_MARKER_HEADER)
}

/// Relay `request` to the downstream origin.
pub async fn forward(
    state: &AppState,
    identity: Option<&str>,
    request: Request,
) -> Result<Response, ProxyError> {
    if has_loop_marker(request.headers()) {
        return Err(ProxyError::Loop);
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned)
        .or_else(|| request.uri().authority().map(|a| a.to_string()));
    let mut target = backend_base(&state.config, host.as_deref())?;
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let original = path_and_query.to_string();
    target.set_path(request.uri().path());
    target.set_query(request.uri().query());

    let (parts, body) = request.into_parts();
    let body = to_bytes(body, MAX_FORWARD_BODY)
        .await
        .map_err(|_| ProxyError::Body)?;

    let mut headers = parts.headers;
    strip_inbound_headers(&mut headers);
    headers.insert(
        FORWARDED_MARKER_HEADER,
        HeaderValue::from_static(FORWARDED_MARKER_VALUE),
    );
    if let Some(identity) = identity {
        state.signer.add_auth_headers(identity, &mut headers)?;
    }

    let upstream = state
        .http
        .request(parts.method.clone(), target.as_str())
        .headers(headers)
        .body(body)
        .send()
        .await?;

    let status = upstream.status();
    tracing::info!(
        method = %parts.method,
        from = %original,
        to = %target,
        %status,
        authenticated = identity.is_some(),
        "Forwarded request"
    );

    let mut response_headers = upstream.headers().clone();
    let bytes = upstream.bytes().await?;
    for name in HOP_BY_HOP.iter().chain([&KEEP_ALIVE, &header::CONTENT_LENGTH]) {
        response_headers.remove(name);
    }

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = response_headers;
    Ok(response)
}

/// Fallback handler: forward anything the gateway does not answer itself.
pub async fn proxy(
    State(state): State<AppState>,
    SessionIdentity(identity): SessionIdentity,
    request: Request,
) -> Response {
    match forward(&state, identity.as_deref(), request).await {
        Ok(response) => response,
        Err(e) => ApiError::from(e).into_response(),
    }
}
