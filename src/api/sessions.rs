//! Study session CRUD. Reads are public; writes are admin-only.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::auth::{CurrentUser, require_admin};
use super::{ApiError, ApiResponse, AppState, MessageDto, SessionDto, validation};

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub group_id: i32,
    /// Defaults to the creation time when absent.
    pub scheduled_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSessionRequest {
    pub scheduled_time: Option<DateTime<Utc>>,
}

/// POST /sessions (admin)
pub async fn create_session(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<ApiResponse<SessionDto>>, ApiError> {
    require_admin(&user)?;
    validation::validate_id(req.group_id, "group")?;

    if state.store.get_group(req.group_id).await?.is_none() {
        return Err(ApiError::not_found("Group", req.group_id));
    }

    let session = state
        .store
        .add_session(req.group_id, req.scheduled_time.map(|t| t.to_rfc3339()))
        .await?;

    Ok(Json(ApiResponse::success(SessionDto::from(session))))
}

/// GET /sessions
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<SessionDto>>>, ApiError> {
    let sessions = state.store.list_sessions().await?;
    Ok(Json(ApiResponse::success(
        sessions.into_iter().map(SessionDto::from).collect(),
    )))
}

/// GET /sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<SessionDto>>, ApiError> {
    validation::validate_id(id, "session")?;

    let session = state
        .store
        .get_session(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Session", id))?;

    Ok(Json(ApiResponse::success(SessionDto::from(session))))
}

/// PUT /sessions/{id} (admin)
pub async fn update_session(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateSessionRequest>,
) -> Result<Json<ApiResponse<SessionDto>>, ApiError> {
    require_admin(&user)?;
    validation::validate_id(id, "session")?;

    let session = state
        .store
        .update_session(id, req.scheduled_time.map(|t| t.to_rfc3339()))
        .await?
        .ok_or_else(|| ApiError::not_found("Session", id))?;

    Ok(Json(ApiResponse::success(SessionDto::from(session))))
}

/// DELETE /sessions/{id} (admin)
pub async fn delete_session(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageDto>>, ApiError> {
    require_admin(&user)?;
    validation::validate_id(id, "session")?;

    let removed = state.store.remove_session(id).await?;
    if !removed {
        return Err(ApiError::not_found("Session", id));
    }

    Ok(Json(ApiResponse::success(MessageDto {
        message: format!("Session {} deleted", id),
    })))
}
