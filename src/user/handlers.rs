use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::UserModel,
    service::UserService,
    types::{SearchQuery, UserRequest},
};
use crate::{
    shared::{AppError, AppState},
    streak::{StreakResult, UserId},
};

fn user_service(state: &AppState) -> UserService {
    UserService::new(Arc::clone(&state.user_repository), Arc::clone(&state.clock))
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// GET /api/users
#[instrument(name = "list_users", skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserModel>>, AppError> {
    let users = user_service(&state).get_all_users().await?;
    info!(user_count = users.len(), "Users listed successfully");
    Ok(Json(users))
}

/// GET /api/users/search?q=term
#[instrument(name = "search_users", skip(state))]
pub async fn search_users(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<UserModel>>, AppError> {
    let users = user_service(&state)
        .search_users(query.q.as_deref())
        .await?;
    info!(user_count = users.len(), "User search completed");
    Ok(Json(users))
}

/// GET /api/users/country/:country
#[instrument(name = "list_users_by_country", skip(state))]
pub async fn list_users_by_country(
    State(state): State<AppState>,
    Path(country): Path<String>,
) -> Result<Json<Vec<UserModel>>, AppError> {
    let users = user_service(&state).get_users_by_country(&country).await?;
    Ok(Json(users))
}

/// GET /api/users/subscription/:subscription_type
#[instrument(name = "list_users_by_subscription", skip(state))]
pub async fn list_users_by_subscription(
    State(state): State<AppState>,
    Path(subscription_type): Path<String>,
) -> Result<Json<Vec<UserModel>>, AppError> {
    let users = user_service(&state)
        .get_users_by_subscription_type(&subscription_type)
        .await?;
    Ok(Json(users))
}

/// GET /api/users/:id
#[instrument(name = "get_user", skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<UserModel>, AppError> {
    user_service(&state)
        .get_user_by_id(user_id)
        .await?
        .map(Json)
        .ok_or_else(user_not_found)
}

/// POST /api/users
#[instrument(name = "create_user", skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<UserRequest>,
) -> Result<(StatusCode, Json<UserModel>), AppError> {
    let user = user_service(&state).create_user(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users/:id
#[instrument(name = "update_user", skip(state, request))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(request): Json<UserRequest>,
) -> Result<Json<UserModel>, AppError> {
    user_service(&state)
        .update_user(user_id, request)
        .await?
        .map(Json)
        .ok_or_else(user_not_found)
}

/// DELETE /api/users/:id
#[instrument(name = "delete_user", skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<StatusCode, AppError> {
    if user_service(&state).delete_user(user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(user_not_found())
    }
}

/// GET /api/users/:id/streak
///
/// Returns the user's current and longest daily listening streaks
#[instrument(name = "get_listening_streak", skip(state))]
pub async fn get_listening_streak(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Result<Json<StreakResult>, AppError> {
    user_service(&state)
        .get_listening_streak(user_id)
        .await?
        .map(Json)
        .ok_or_else(user_not_found)
}
