//! Repair service offering endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{DeleteResponse, ServiceEntity, ServiceRequest};
use crate::AppState;

use super::error::ApiError;

/// Name given to services created without one
const DEFAULT_SERVICE_NAME: &str = "Unnamed Service";

async fn find_service(state: &AppState, id: i64) -> Result<ServiceEntity, ApiError> {
    sqlx::query_as::<_, ServiceEntity>("SELECT * FROM services WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Service not found"))
}

pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ServiceEntity>>, ApiError> {
    let services = sqlx::query_as::<_, ServiceEntity>("SELECT * FROM services ORDER BY id")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(services))
}

pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ServiceEntity>, ApiError> {
    Ok(Json(find_service(&state, id).await?))
}

pub async fn create_service(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ServiceRequest>,
) -> Result<(StatusCode, Json<ServiceEntity>), ApiError> {
    if matches!(req.base_price, Some(p) if p < 0) {
        return Err(ApiError::validation_field("basePrice", "Giá tiền không được âm"));
    }

    let result = sqlx::query(
        "INSERT INTO services (name, description, base_price, unit) VALUES (?, ?, ?, ?)",
    )
    .bind(req.name.as_deref().unwrap_or(DEFAULT_SERVICE_NAME))
    .bind(&req.description)
    .bind(req.base_price)
    .bind(&req.unit)
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create service: {}", e);
        ApiError::database("Failed to create service")
    })?;

    let service = find_service(&state, result.last_insert_rowid()).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn update_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<ServiceRequest>,
) -> Result<Json<ServiceEntity>, ApiError> {
    if matches!(req.base_price, Some(p) if p < 0) {
        return Err(ApiError::validation_field("basePrice", "Giá tiền không được âm"));
    }

    let result = sqlx::query(
        r#"
        UPDATE services SET
            name = COALESCE(?, name),
            description = COALESCE(?, description),
            base_price = COALESCE(?, base_price),
            unit = COALESCE(?, unit)
        WHERE id = ?
        "#,
    )
    .bind(&req.name)
    .bind(&req.description)
    .bind(req.base_price)
    .bind(&req.unit)
    .bind(id)
    .execute(&state.db)
    .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Service not found"));
    }

    Ok(Json(find_service(&state, id).await?))
}

pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM services WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Service not found"));
    }
    Ok(Json(DeleteResponse::ok()))
}
