//! User account management endpoints.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;

use super::auth::{CurrentUser, require_admin, require_self_or_admin};
use super::{ApiError, ApiResponse, AppState, MessageDto, UserDto, validation};
use crate::entities::users::Role;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// GET /users (admin)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    require_admin(&user)?;

    let users = state.store.list_users().await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

/// GET /users/{id} (self or admin)
///
/// The ownership check runs before the lookup, so a non-admin probing a
/// foreign id gets 403 whether or not that id exists.
pub async fn get_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    require_self_or_admin(&user, id)?;
    validation::validate_id(id, "user")?;

    let target = state
        .store
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    Ok(Json(ApiResponse::success(UserDto::from(target))))
}

/// PUT /users/update-profile
///
/// Updates the authenticated caller's own record. Absent fields stay as-is.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    if let Some(name) = &req.name {
        validation::validate_required(name, "name")?;
    }
    if let Some(email) = &req.email {
        validation::validate_email(email)?;
        if let Some(existing) = state.store.get_user_by_email(email).await? {
            if existing.id != user.id {
                return Err(ApiError::conflict("Email already registered"));
            }
        }
    }

    let updated = state
        .store
        .update_user_profile(user.id, req.name, req.email)
        .await?
        .ok_or_else(|| ApiError::not_found("User", user.id))?;

    Ok(Json(ApiResponse::success(UserDto::from(updated))))
}

/// PUT /users/promote/{id} (admin)
pub async fn promote_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    require_admin(&user)?;
    validation::validate_id(id, "user")?;

    let target = state
        .store
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    if target.role == Role::Admin {
        return Err(ApiError::conflict("User is already an admin"));
    }

    let promoted = state
        .store
        .set_user_role(id, Role::Admin)
        .await?
        .ok_or_else(|| ApiError::not_found("User", id))?;

    Ok(Json(ApiResponse::success(UserDto::from(promoted))))
}

/// DELETE /users/{id} (admin)
///
/// Removes the user's membership row in the same transaction.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageDto>>, ApiError> {
    require_admin(&user)?;
    validation::validate_id(id, "user")?;

    let removed = state.store.remove_user(id).await?;
    if !removed {
        return Err(ApiError::not_found("User", id));
    }

    Ok(Json(ApiResponse::success(MessageDto {
        message: format!("User {} deleted", id),
    })))
}
