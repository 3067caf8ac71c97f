//! Category endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::catalog::CategoryWithProducts;
use crate::db::{Category, CategoryRequest, DeleteResponse};
use crate::AppState;

use super::error::ApiError;

/// Name given to categories created without one
const DEFAULT_CATEGORY_NAME: &str = "Unnamed Category";

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(categories))
}

pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Category>, ApiError> {
    let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;
    Ok(Json(category))
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let name = req.name.unwrap_or_else(|| DEFAULT_CATEGORY_NAME.to_string());

    let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
        .bind(&name)
        .execute(&state.db)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create category: {}", e);
            ApiError::database("Failed to create category")
        })?;

    let id = result.last_insert_rowid();
    info!("Created category {} ({})", id, name);
    Ok((StatusCode::CREATED, Json(Category { id, name })))
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<CategoryRequest>,
) -> Result<Json<Category>, ApiError> {
    let result = sqlx::query("UPDATE categories SET name = COALESCE(?, name) WHERE id = ?")
        .bind(&req.name)
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Category not found"));
    }

    get_category(State(state), Path(id)).await
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Category not found"));
    }
    Ok(Json(DeleteResponse::ok()))
}

/// A category with every product in it
pub async fn category_products(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<CategoryWithProducts>, ApiError> {
    Ok(Json(state.catalog.category_with_products(id).await?))
}
