// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{enforce_https, require_authorization},
    error::ErrorBody,
    proxy,
    state::AppState,
};

pub mod health;
pub mod navigation;
pub mod search;
pub mod session;

/// Tags each request with a random UUID unless the edge already set one.
#[derive(Debug, Clone, Copy, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        id.parse().ok().map(RequestId::new)
    }
}

/// The gateway router. Anything without a route of its own is forwarded to
/// the downstream application.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/verify", post(session::verify))
        .route("/api/logout", post(session::logout))
        .route("/_gateway/health", get(health::health))
        .route("/search", get(search::search).fallback(proxy::proxy))
        .route("/{kind}/{id}/next", get(navigation::next).fallback(proxy::proxy))
        .route("/{kind}/{id}/previous", get(navigation::previous).fallback(proxy::proxy))
        .merge(
            SwaggerUi::new("/_gateway/docs").url("/_gateway/openapi.json", ApiDoc::openapi()),
        )
        .fallback(proxy::proxy)
        .layer(middleware::from_fn_with_state(state.clone(), require_authorization))
        .layer(middleware::from_fn_with_state(state.clone(), enforce_https))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        session::verify,
        session::logout,
        health::health,
        search::search,
        navigation::next,
        navigation::previous
    ),
    components(
        schemas(
            ErrorBody,
            health::HealthResponse,
            health::HealthChecks,
            search::SearchResponse
        )
    ),
    tags(
        (name = "Session", description = "Login and logout"),
        (name = "Search", description = "Record search across types"),
        (name = "Navigation", description = "Sequential record navigation"),
        (name = "Health", description = "Gateway health")
    )
)]
pub struct ApiDoc;
