// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sequential navigation between records of one type.
//!
//! `GET /{type}/{id}/next` and `/previous` answer with a 307 to the neighbor's
//! canonical URL, or to the current record when there is no neighbor. Unknown
//! type names are forwarded downstream untouched.

use axum::{
    extract::{Path, Request, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::SessionIdentity;
use crate::error::ApiError;
use crate::models::{lookup, next_id, prev_id};
use crate::proxy;
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
enum Direction {
    Next,
    Previous,
}

async fn navigate(
    state: AppState,
    identity: SessionIdentity,
    kind: String,
    id: String,
    direction: Direction,
    request: Request,
) -> Response {
    if lookup(&kind).is_none() {
        return proxy::proxy(State(state), identity, request).await;
    }
    match resolve(&state, &kind, &id, direction).await {
        Ok(target) => Redirect::temporary(&format!("/{kind}/{target}")).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn resolve(
    state: &AppState,
    kind: &str,
    id: &str,
    direction: Direction,
) -> Result<u64, ApiError> {
    let current: u64 = id.parse().map_err(|_| ApiError::bad_request("Bad ID"))?;
    let store = state.store.clone();
    let kind = kind.to_string();
    let neighbor = tokio::task::spawn_blocking(move || match direction {
        Direction::Next => next_id(store.as_ref(), &kind, current),
        Direction::Previous => prev_id(store.as_ref(), &kind, current),
    })
    .await??;
    Ok(neighbor)
}

/// Redirect to the record after `id`.
#[utoipa::path(
    get,
    path = "/{kind}/{id}/next",
    tag = "Navigation",
    params(
        ("kind" = String, Path, description = "Record type name, e.g. plasmid"),
        ("id" = u64, Path, description = "Current record identity")
    ),
    responses(
        (status = 307, description = "Redirect to the following record"),
        (status = 400, description = "Bad ID", body = crate::error::ErrorBody)
    )
)]
pub async fn next(
    State(state): State<AppState>,
    identity: SessionIdentity,
    Path((kind, id)): Path<(String, String)>,
    request: Request,
) -> Response {
    navigate(state, identity, kind, id, Direction::Next, request).await
}

/// Redirect to the record before `id`.
#[utoipa::path(
    get,
    path = "/{kind}/{id}/previous",
    tag = "Navigation",
    params(
        ("kind" = String, Path, description = "Record type name, e.g. plasmid"),
        ("id" = u64, Path, description = "Current record identity")
    ),
    responses(
        (status = 307, description = "Redirect to the preceding record"),
        (status = 400, description = "Bad ID", body = crate::error::ErrorBody)
    )
)]
pub async fn previous(
    State(state): State<AppState>,
    identity: SessionIdentity,
    Path((kind, id)): Path<(String, String)>,
    request: Request,
) -> Response {
    navigate(state, identity, kind, id, Direction::Previous, request).await
}
