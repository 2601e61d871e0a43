// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Idea API endpoints.
//!
//! Reads are public. Create, update and delete run behind the authorization
//! gate, and update and delete additionally require the caller to own the
//! idea.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{IdeaRequest, ListIdeasQuery, MessageResponse},
    state::AppState,
    storage::{Idea, IdeaRepository, OwnershipEnforcer, StorageError},
};

const IDEA_NOT_FOUND: &str = "Idea Not Found";
const FIELDS_REQUIRED: &str = "Title, summary and description are required";

/// An id segment that cannot be extracted names no idea.
fn path_idea_id(path: Result<Path<String>, PathRejection>) -> Result<String, ApiError> {
    path.map(|Path(id)| id).map_err(|e| {
        tracing::debug!(error = %e, "Unreadable idea id");
        ApiError::not_found(IDEA_NOT_FOUND)
    })
}

fn load_idea(repo: &IdeaRepository<'_>, idea_id: &str) -> Result<Idea, ApiError> {
    repo.get(idea_id).map_err(|e| match e {
        StorageError::NotFound(_) => ApiError::not_found(IDEA_NOT_FOUND),
        other => other.into(),
    })
}

/// List ideas, newest first.
#[utoipa::path(
    get,
    path = "/api/ideas",
    tag = "Ideas",
    params(ListIdeasQuery),
    responses(
        (status = 200, description = "Ideas, newest first", body = Vec<Idea>)
    )
)]
pub async fn list_ideas(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Idea>>, ApiError> {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let limit = ListIdeasQuery::from_pairs(pairs).limit();
    let ideas = IdeaRepository::new(state.storage()).list_recent(limit)?;
    Ok(Json(ideas))
}

/// Get a single idea.
#[utoipa::path(
    get,
    path = "/api/ideas/{idea_id}",
    tag = "Ideas",
    params(("idea_id" = String, Path, description = "Idea ID")),
    responses(
        (status = 200, description = "The idea", body = Idea),
        (status = 404, description = "Idea not found")
    )
)]
pub async fn get_idea(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Idea>, ApiError> {
    let idea_id = path_idea_id(path)?;
    let repo = IdeaRepository::new(state.storage());
    Ok(Json(load_idea(&repo, &idea_id)?))
}

/// Create an idea owned by the caller.
#[utoipa::path(
    post,
    path = "/api/ideas",
    tag = "Ideas",
    security(("bearer_auth" = [])),
    request_body = IdeaRequest,
    responses(
        (status = 201, description = "Idea created", body = Idea),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_idea(
    Auth(user): Auth,
    State(state): State<AppState>,
    body: Result<Json<IdeaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Idea>), ApiError> {
    let fields = body
        .map(|Json(r)| r)
        .unwrap_or_default()
        .validate()
        .ok_or_else(|| ApiError::bad_request(FIELDS_REQUIRED))?;

    let idea = Idea::new(
        user.id.clone(),
        &fields.title,
        &fields.summary,
        fields.description,
        fields.tags,
    );
    IdeaRepository::new(state.storage()).create(&idea)?;

    tracing::info!(idea_id = %idea.id, user_id = %user.id, "Idea created");
    Ok((StatusCode::CREATED, Json(idea)))
}

/// Replace an idea's fields. Only the owner may do this.
#[utoipa::path(
    put,
    path = "/api/ideas/{idea_id}",
    tag = "Ideas",
    security(("bearer_auth" = [])),
    params(("idea_id" = String, Path, description = "Idea ID")),
    request_body = IdeaRequest,
    responses(
        (status = 200, description = "Idea updated", body = Idea),
        (status = 400, description = "Missing required fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller does not own the idea"),
        (status = 404, description = "Idea not found")
    )
)]
pub async fn update_idea(
    Auth(user): Auth,
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<IdeaRequest>, JsonRejection>,
) -> Result<Json<Idea>, ApiError> {
    let idea_id = path_idea_id(path)?;
    let repo = IdeaRepository::new(state.storage());
    let mut idea = load_idea(&repo, &idea_id)?;

    idea.verify_ownership(&user).map_err(|e| {
        tracing::warn!(error = %e, "Rejected idea update");
        ApiError::forbidden("Not authorized to update this idea")
    })?;

    let fields = body
        .map(|Json(r)| r)
        .unwrap_or_default()
        .validate()
        .ok_or_else(|| ApiError::bad_request(FIELDS_REQUIRED))?;

    idea.apply_edit(&fields.title, &fields.summary, fields.description, fields.tags);
    repo.update(&idea).map_err(|e| match e {
        StorageError::NotFound(_) => ApiError::not_found(IDEA_NOT_FOUND),
        other => other.into(),
    })?;

    Ok(Json(idea))
}

/// Delete an idea. Only the owner may do this.
#[utoipa::path(
    delete,
    path = "/api/ideas/{idea_id}",
    tag = "Ideas",
    security(("bearer_auth" = [])),
    params(("idea_id" = String, Path, description = "Idea ID")),
    responses(
        (status = 200, description = "Idea deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller does not own the idea"),
        (status = 404, description = "Idea not found")
    )
)]
pub async fn delete_idea(
    Auth(user): Auth,
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let idea_id = path_idea_id(path)?;
    let repo = IdeaRepository::new(state.storage());
    let idea = load_idea(&repo, &idea_id)?;

    idea.verify_ownership(&user).map_err(|e| {
        tracing::warn!(error = %e, "Rejected idea delete");
        ApiError::forbidden("Not authorized to delete this idea")
    })?;

    repo.delete(&idea.id).map_err(|e| match e {
        StorageError::NotFound(_) => ApiError::not_found(IDEA_NOT_FOUND),
        other => other.into(),
    })?;

    tracing::info!(idea_id = %idea.id, user_id = %user.id, "Idea deleted");
    Ok(Json(MessageResponse::new("Idea deleted successfully")))
}
