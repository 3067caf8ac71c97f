//! Product endpoints, backed by the catalog component.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::catalog::ProductView;
use crate::db::{DeleteResponse, ProductInput};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::validate_price;

fn validate_product_input(input: &ProductInput) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    for price in input.prices().unwrap_or_default() {
        if let Err(e) = validate_price(Some(price)) {
            errors.add("productPrices", e);
        }
    }

    errors.finish()
}

pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProductView>>, ApiError> {
    Ok(Json(state.catalog.list().await?))
}

pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ProductView>, ApiError> {
    Ok(Json(state.catalog.get(id).await?))
}

/// Create a product. An unknown category falls back to the first one.
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ProductView>), ApiError> {
    validate_product_input(&input)?;
    let product = state.catalog.create(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Merge the provided fields into a product
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductView>, ApiError> {
    validate_product_input(&input)?;
    Ok(Json(state.catalog.update(id, &input).await?))
}

pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.catalog.delete(id).await?;
    Ok(Json(DeleteResponse::ok()))
}
