//! Shared resource links. The whole surface is public.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use super::{ApiError, ApiResponse, AppState, ResourceDto, validation};

#[derive(Debug, Deserialize)]
pub struct CreateResourceRequest {
    pub group_id: i32,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateResourceRequest {
    pub title: Option<String>,
    pub url: Option<String>,
}

/// POST /resources
pub async fn create_resource(
    State(state): State<AppState>,
    Json(req): Json<CreateResourceRequest>,
) -> Result<Json<ApiResponse<ResourceDto>>, ApiError> {
    validation::validate_id(req.group_id, "group")?;
    validation::validate_required(&req.title, "title")?;
    validation::validate_required(&req.url, "url")?;

    if state.store.get_group(req.group_id).await?.is_none() {
        return Err(ApiError::not_found("Group", req.group_id));
    }

    let resource = state
        .store
        .add_resource(req.group_id, &req.title, &req.url)
        .await?;

    Ok(Json(ApiResponse::success(ResourceDto::from(resource))))
}

/// GET /resources
pub async fn list_resources(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ResourceDto>>>, ApiError> {
    let resources = state.store.list_resources().await?;
    Ok(Json(ApiResponse::success(
        resources.into_iter().map(ResourceDto::from).collect(),
    )))
}

/// GET /resources/{id}
pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ResourceDto>>, ApiError> {
    validation::validate_id(id, "resource")?;

    let resource = state
        .store
        .get_resource(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Resource", id))?;

    Ok(Json(ApiResponse::success(ResourceDto::from(resource))))
}

/// PUT /resources/{id}
pub async fn update_resource(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateResourceRequest>,
) -> Result<Json<ApiResponse<ResourceDto>>, ApiError> {
    validation::validate_id(id, "resource")?;
    if let Some(title) = &req.title {
        validation::validate_required(title, "title")?;
    }
    if let Some(url) = &req.url {
        validation::validate_required(url, "url")?;
    }

    let resource = state
        .store
        .update_resource(id, req.title, req.url)
        .await?
        .ok_or_else(|| ApiError::not_found("Resource", id))?;

    Ok(Json(ApiResponse::success(ResourceDto::from(resource))))
}
