// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::search::{search as run_search, SearchRequest};
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Literal, glob (`*`) or `/regex/` (`/regex/i`) term.
    pub term: Option<String>,
    /// `1` to also search sequence text.
    pub seq: Option<String>,
    /// Owner name to restrict results to.
    pub person: Option<String>,
    /// JSON array of type names, e.g. `["plasmid","oligos"]`.
    pub types: Option<String>,
}

impl SearchParams {
    fn into_request(self) -> Result<SearchRequest, ApiError> {
        let invalid = || ApiError::bad_request("Invalid search query");
        let term = self.term.filter(|t| !t.is_empty()).ok_or_else(invalid)?;
        let types: Vec<String> = self
            .types
            .as_deref()
            .and_then(|raw| serde_json::from_str::<Vec<String>>(raw).ok())
            .filter(|types| !types.is_empty())
            .ok_or_else(invalid)?;
        Ok(SearchRequest {
            term,
            include_sequence: self.seq.as_deref() == Some("1"),
            owner: self.person.filter(|p| !p.is_empty()),
            types,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchResponse {
    /// Hits as `[model name, id]` pairs.
    #[schema(value_type = Vec<Vec<Object>>)]
    pub items: Vec<(&'static str, u64)>,
    /// The raw term, for direct identity lookups by the caller.
    pub term: String,
}

/// Search records of the requested types.
#[utoipa::path(
    get,
    path = "/search",
    tag = "Search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching records", body = SearchResponse),
        (status = 400, description = "Invalid search query", body = crate::error::ErrorBody),
        (status = 403, description = "Forbidden", body = crate::error::ErrorBody)
    )
)]
pub async fn search(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let request = params.into_request()?;
    tracing::debug!(user = %user.email, term = %request.term, types = ?request.types, "Search");

    let store = state.store.clone();
    let outcome =
        tokio::task::spawn_blocking(move || run_search(store.as_ref(), &request)).await??;

    Ok(Json(SearchResponse {
        items: outcome
            .items
            .iter()
            .map(|e| (e.model_name(), e.id()))
            .collect(),
        term: outcome.term,
    }))
}
