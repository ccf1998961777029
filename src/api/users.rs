use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use std::sync::Arc;

use super::auth::AuthUser;
use super::validation::{validate_changes, validate_new_user};
use super::{
    ApiError, AppState, CreatedUserResponse, DeletedResponse, FavoritedResponse,
    FavoritesResponse, UserDetailResponse, UserResponse, UsersResponse,
};
use crate::models::user::{NewUser, UserChanges};
use crate::services::{require_admin, require_field_access, require_self_or_admin};

/// GET /users
/// Admin only
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UsersResponse>, ApiError> {
    require_admin(&claims)?;

    let users = state.users().list_all().await?;
    Ok(Json(UsersResponse { users }))
}

/// POST /users
/// Admin only; may create admins. Returns the new user and a token for them.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    require_admin(&claims)?;

    let Json(new_user) = payload?;
    validate_new_user(&new_user)?;

    let user = state.users().register(new_user).await?;
    let token = state.tokens().issue(&user.username, user.is_admin)?;

    tracing::info!(created = %user.username, by = %claims.username, "User created by admin");

    Ok((StatusCode::CREATED, Json(CreatedUserResponse { user, token })))
}

/// GET /users/{username}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<UserDetailResponse>, ApiError> {
    require_self_or_admin(&claims, &username)?;

    let user = state.users().get(&username).await?;
    Ok(Json(UserDetailResponse { user }))
}

/// PATCH /users/{username}
/// Any subset of firstName, lastName, password, email, isAdmin
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(username): Path<String>,
    payload: Result<Json<UserChanges>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    require_self_or_admin(&claims, &username)?;

    let Json(changes) = payload?;
    validate_changes(&changes)?;
    require_field_access(
        &claims,
        &changes,
        state.config().security.restrict_admin_field,
    )?;

    let user = state.users().update(&username, changes).await?;
    Ok(Json(UserResponse { user }))
}

/// DELETE /users/{username}
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    require_self_or_admin(&claims, &username)?;

    state.users().delete(&username).await?;
    Ok(Json(DeletedResponse { deleted: username }))
}

/// POST /users/{username}/recipes/{id}
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path((username, recipe_id)): Path<(String, String)>,
) -> Result<Json<FavoritedResponse>, ApiError> {
    require_self_or_admin(&claims, &username)?;

    state.users().add_favorite(&username, &recipe_id).await?;
    Ok(Json(FavoritedResponse {
        favorited: recipe_id,
    }))
}

/// GET /users/{username}/recipes/favorites
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path(username): Path<String>,
) -> Result<Json<FavoritesResponse>, ApiError> {
    require_self_or_admin(&claims, &username)?;

    let favorites = state.users().list_favorites(&username).await?;
    Ok(Json(FavoritesResponse { favorites }))
}

/// DELETE /users/{username}/recipes/{id}
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
    Path((username, recipe_id)): Path<(String, String)>,
) -> Result<Json<DeletedResponse>, ApiError> {
    require_self_or_admin(&claims, &username)?;

    state.users().remove_favorite(&username, &recipe_id).await?;
    Ok(Json(DeletedResponse { deleted: recipe_id }))
}
