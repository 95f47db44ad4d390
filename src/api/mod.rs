use axum::{
    Json, Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;

pub mod auth;
mod error;
mod groups;
mod resources;
mod sessions;
mod types;
mod users;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,

    pub config: Arc<Config>,
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<AppState> {
    let store = Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await?;

    Ok(AppState {
        store,
        config: Arc::new(config),
    })
}

async fn root() -> Json<ApiResponse<MessageDto>> {
    Json(ApiResponse::success(MessageDto {
        message: "API is running!".to_string(),
    }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

pub fn router(state: AppState) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    // Public routes are added after the merge; paths shared with the
    // protected router carry disjoint methods.
    Router::new()
        .merge(create_protected_router(state.clone()))
        .route("/", get(root))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/groups", get(groups::list_groups))
        .route("/groups/{id}", get(groups::get_group))
        .route("/sessions", get(sessions::list_sessions))
        .route("/sessions/{id}", get(sessions::get_session))
        .route("/resources", get(resources::list_resources))
        .route("/resources", post(resources::create_resource))
        .route("/resources/{id}", get(resources::get_resource))
        .route("/resources/{id}", put(resources::update_resource))
        .fallback(not_found)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn create_protected_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/groups", post(groups::create_group))
        .route("/groups/{id}", put(groups::update_group))
        .route("/groups/{id}", delete(groups::delete_group))
        .route("/groups/join-group", post(groups::join_group))
        .route("/groups/leave-group/{user_id}", delete(groups::leave_group))
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/{id}", put(sessions::update_session))
        .route("/sessions/{id}", delete(sessions::delete_session))
        .route("/users", get(users::list_users))
        .route("/users/update-profile", put(users::update_profile))
        .route("/users/promote/{id}", put(users::promote_user))
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}", delete(users::delete_user))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
