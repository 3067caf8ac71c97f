//! Supplier endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{DeleteResponse, Supplier, SupplierProduct, SupplierRequest, SupplierWithProducts};
use crate::AppState;

use super::error::ApiError;
use super::validation::validate_website;

/// Name given to suppliers created without one
const DEFAULT_SUPPLIER_NAME: &str = "Unnamed Supplier";

async fn find_supplier(state: &AppState, id: i64) -> Result<Supplier, ApiError> {
    sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Supplier not found"))
}

pub async fn list_suppliers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Supplier>>, ApiError> {
    let suppliers = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers ORDER BY id")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(suppliers))
}

pub async fn get_supplier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Supplier>, ApiError> {
    Ok(Json(find_supplier(&state, id).await?))
}

pub async fn create_supplier(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SupplierRequest>,
) -> Result<(StatusCode, Json<Supplier>), ApiError> {
    if let Err(e) = validate_website(&req.website) {
        return Err(ApiError::validation_field("website", e));
    }

    let result = sqlx::query("INSERT INTO suppliers (name, website) VALUES (?, ?)")
        .bind(req.name.as_deref().unwrap_or(DEFAULT_SUPPLIER_NAME))
        .bind(&req.website)
        .execute(&state.db)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create supplier: {}", e);
            ApiError::database("Failed to create supplier")
        })?;

    let supplier = find_supplier(&state, result.last_insert_rowid()).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn update_supplier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<SupplierRequest>,
) -> Result<Json<Supplier>, ApiError> {
    if let Err(e) = validate_website(&req.website) {
        return Err(ApiError::validation_field("website", e));
    }

    let result = sqlx::query(
        "UPDATE suppliers SET name = COALESCE(?, name), website = COALESCE(?, website) WHERE id = ?",
    )
    .bind(&req.name)
    .bind(&req.website)
    .bind(id)
    .execute(&state.db)
    .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Supplier not found"));
    }

    Ok(Json(find_supplier(&state, id).await?))
}

pub async fn delete_supplier(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM suppliers WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Supplier not found"));
    }
    Ok(Json(DeleteResponse::ok()))
}

/// A supplier with the products it prices
pub async fn supplier_products(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SupplierWithProducts>, ApiError> {
    let supplier = find_supplier(&state, id).await?;

    let products = sqlx::query_as::<_, SupplierProduct>(
        r#"
        SELECT p.id AS product_id, p.name AS product_name, pp.price, pp.supplier_link
        FROM product_prices pp
        JOIN products p ON p.id = pp.product_id
        WHERE pp.supplier_id = ?
        ORDER BY pp.id
        "#,
    )
    .bind(id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(SupplierWithProducts {
        id: supplier.id,
        name: supplier.name,
        website: supplier.website,
        products,
    }))
}
