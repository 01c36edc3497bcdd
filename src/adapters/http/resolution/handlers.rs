//! HTTP handlers for resolution endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::application::resolution::SessionRegistry;
use crate::domain::archetype::Category;
use crate::domain::foundation::SessionId;

use super::dto::{
    ApiError, ArchetypeResponse, ProphecyResponse, ResolveArchetypeRequest,
    ResolveProphecyRequest,
};

fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    raw.parse().map_err(ApiError::InvalidSessionId)
}

/// POST /api/sessions/:session_id/archetype
pub async fn resolve_archetype(
    State(registry): State<SessionRegistry>,
    Path(session_id): Path<String>,
    Json(req): Json<ResolveArchetypeRequest>,
) -> Result<Json<ArchetypeResponse>, ApiError> {
    let session_id = parse_session_id(&session_id)?;
    let outcome = registry.resolve_archetype(session_id, &req.answers).await;
    Ok(Json(outcome.into()))
}

/// POST /api/sessions/:session_id/prophecy
pub async fn resolve_prophecy(
    State(registry): State<SessionRegistry>,
    Path(session_id): Path<String>,
    Json(req): Json<ResolveProphecyRequest>,
) -> Result<Json<ProphecyResponse>, ApiError> {
    let session_id = parse_session_id(&session_id)?;
    let category: Category = req.category.parse().map_err(ApiError::UnknownCategory)?;
    let outcome = registry.resolve_prophecy(session_id, category).await;
    Ok(Json(outcome.into()))
}

/// DELETE /api/sessions/:session_id
pub async fn reset_session(
    State(registry): State<SessionRegistry>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let session_id = parse_session_id(&session_id)?;
    registry.reset(session_id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    "ok"
}
