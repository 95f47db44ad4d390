//! Registration, login, and the token-checking middleware.
//!
//! Every failed token resolution (missing header, bad signature, expiry,
//! unknown subject) collapses into the same generic 401 so responses never
//! reveal which check failed. Role and ownership checks are plain predicates
//! over the already-resolved [`CurrentUser`].

use axum::{
    Json,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::debug;

use super::{ApiError, ApiResponse, AppState, TokenDto, UserDto, validation};
use crate::auth::{self, Claims};
use crate::entities::users::Role;

/// Authenticated caller, resolved from the token subject against the users
/// table and injected into request extensions by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i32,
    pub email: String,
    pub role: Role,
}

/// Rejects the request with 401 unless a valid bearer token resolves to an
/// existing user; otherwise injects [`CurrentUser`] and runs the handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(ApiError::invalid_credentials)?;

    let claims = auth::decode_token(token, &state.config.security)
        .map_err(|_| ApiError::invalid_credentials())?;

    let user = state
        .store
        .get_user_by_email(&claims.sub)
        .await?
        .ok_or_else(|| {
            debug!(subject = %claims.sub, "Token subject no longer exists");
            ApiError::invalid_credentials()
        })?;

    request.extensions_mut().insert(CurrentUser {
        id: user.id,
        email: user.email,
        role: user.role,
    });

    Ok(next.run(request).await)
}

pub fn require_admin(user: &CurrentUser) -> Result<(), ApiError> {
    if user.role == Role::Admin {
        Ok(())
    } else {
        Err(ApiError::forbidden("Admin privileges required"))
    }
}

/// Permits the target user themselves plus any admin.
pub fn require_self_or_admin(user: &CurrentUser, target_user_id: i32) -> Result<(), ApiError> {
    if user.id == target_user_id || user.role == Role::Admin {
        Ok(())
    } else {
        Err(ApiError::forbidden("Not permitted to act for another user"))
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/register
///
/// Always creates a regular user; the promote workflow is the only path to
/// admin.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<UserDto>>, ApiError> {
    validation::validate_required(&req.name, "name")?;
    validation::validate_required(&req.password, "password")?;
    validation::validate_email(&req.email)?;

    if state.store.get_user_by_email(&req.email).await?.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }

    let user = state
        .store
        .create_user(&req.name, &req.email, &req.password, &state.config.security)
        .await?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenDto>>, ApiError> {
    let valid = state
        .store
        .verify_user_password(&req.email, &req.password)
        .await?;
    if !valid {
        // Same message for unknown email and wrong password.
        return Err(ApiError::Unauthorized(
            "Incorrect email or password".to_string(),
        ));
    }

    let user = state
        .store
        .get_user_by_email(&req.email)
        .await?
        .ok_or_else(ApiError::invalid_credentials)?;

    let claims = Claims::new(&user.email, user.role, &state.config.security);
    let token = auth::issue_token(&claims, &state.config.security)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(ApiResponse::success(TokenDto {
        access_token: token,
        token_type: "bearer".to_string(),
    })))
}
