//! Account endpoints: registration, login and profile management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{AuthResponse, DeleteResponse, LoginRequest, RegisterRequest, UserPatch, UserResponse};
use crate::AppState;

use super::error::ApiError;

/// Register a new account and return a registration token
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let response = state.accounts.register(&req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with email, phone or username
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    Ok(Json(state.accounts.login(&req).await?))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(state.accounts.get(id).await?))
}

/// Partially update fullname, phone, dob and address
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<UserResponse>, ApiError> {
    Ok(Json(state.accounts.patch(id, patch).await?))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.accounts.delete(id).await?;
    Ok(Json(DeleteResponse::ok()))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    Ok(Json(state.accounts.list().await?))
}
