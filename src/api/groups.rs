//! Study group CRUD and the membership endpoints.
//!
//! Reads are public; create/update/delete are admin-only. Join and leave
//! require authentication and permit only the target user or an admin,
//! since they mutate another user's membership state.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;

use super::auth::{CurrentUser, require_admin, require_self_or_admin};
use super::{ApiError, ApiResponse, AppState, GroupDto, MembershipDto, MessageDto, validation};

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    /// Absent leaves the description unchanged; an explicit null clears it.
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub description: Option<Option<String>>,
}

fn deserialize_nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Deserialize)]
pub struct JoinGroupRequest {
    pub user_id: i32,
    pub group_id: i32,
}

/// POST /groups (admin)
pub async fn create_group(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateGroupRequest>,
) -> Result<Json<ApiResponse<GroupDto>>, ApiError> {
    require_admin(&user)?;
    validation::validate_required(&req.name, "name")?;

    let group = state
        .store
        .add_group(&req.name, req.description.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(GroupDto::from(group))))
}

/// GET /groups
pub async fn list_groups(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<GroupDto>>>, ApiError> {
    let groups = state.store.list_groups().await?;
    Ok(Json(ApiResponse::success(
        groups.into_iter().map(GroupDto::from).collect(),
    )))
}

/// GET /groups/{id}
pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<GroupDto>>, ApiError> {
    validation::validate_id(id, "group")?;

    let group = state
        .store
        .get_group(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Group", id))?;

    Ok(Json(ApiResponse::success(GroupDto::from(group))))
}

/// PUT /groups/{id} (admin)
///
/// Only the fields present in the body are applied.
pub async fn update_group(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateGroupRequest>,
) -> Result<Json<ApiResponse<GroupDto>>, ApiError> {
    require_admin(&user)?;
    validation::validate_id(id, "group")?;
    if let Some(name) = &req.name {
        validation::validate_required(name, "name")?;
    }

    let group = state
        .store
        .update_group(id, req.name, req.description)
        .await?
        .ok_or_else(|| ApiError::not_found("Group", id))?;

    Ok(Json(ApiResponse::success(GroupDto::from(group))))
}

/// DELETE /groups/{id} (admin)
///
/// Removes the group's members, sessions, and resources in the same
/// transaction.
pub async fn delete_group(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<MessageDto>>, ApiError> {
    require_admin(&user)?;
    validation::validate_id(id, "group")?;

    let removed = state.store.remove_group(id).await?;
    if !removed {
        return Err(ApiError::not_found("Group", id));
    }

    Ok(Json(ApiResponse::success(MessageDto {
        message: format!("Group {} deleted", id),
    })))
}

/// POST /groups/join-group (self or admin)
pub async fn join_group(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<JoinGroupRequest>,
) -> Result<Json<ApiResponse<MembershipDto>>, ApiError> {
    require_self_or_admin(&user, req.user_id)?;
    validation::validate_id(req.user_id, "user")?;
    validation::validate_id(req.group_id, "group")?;

    let membership = state.store.join_group(req.user_id, req.group_id).await?;

    Ok(Json(ApiResponse::success(MembershipDto::from(membership))))
}

/// DELETE /groups/leave-group/{user_id} (self or admin)
pub async fn leave_group(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(user_id): Path<i32>,
) -> Result<Json<ApiResponse<MessageDto>>, ApiError> {
    require_self_or_admin(&user, user_id)?;
    validation::validate_id(user_id, "user")?;

    state.store.leave_group(user_id).await?;

    Ok(Json(ApiResponse::success(MessageDto {
        message: format!("User {} left their group", user_id),
    })))
}
