//! Order endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{
    now_timestamp, parse_phone_number, DeleteResponse, Order, OrderRequest, OrderResponse,
    DEFAULT_ORDER_STATUS,
};
use crate::AppState;

use super::error::ApiError;
use super::validation::validate_price;

async fn find_order(state: &AppState, id: i64) -> Result<OrderResponse, ApiError> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Order not found"))?;
    Ok(order.into())
}

/// Empty strings count as "not provided" for text fields
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub async fn list_orders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY id")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<OrderResponse>, ApiError> {
    Ok(Json(find_order(&state, id).await?))
}

pub async fn user_orders(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE user_id = ? ORDER BY id")
        .bind(user_id)
        .fetch_all(&state.db)
        .await?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

/// Place an order. Only the digits of `phone` are kept.
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    if let Err(e) = validate_price(req.total_price) {
        return Err(ApiError::validation_field("totalPrice", e));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO orders (user_id, build_id, status, total_price, payment_method, phone, address, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(req.user_id)
    .bind(req.build_id)
    .bind(req.status.as_deref().unwrap_or(DEFAULT_ORDER_STATUS))
    .bind(req.total_price)
    .bind(&req.payment_method)
    .bind(req.phone.as_deref().and_then(parse_phone_number))
    .bind(&req.address)
    .bind(now_timestamp())
    .execute(&state.db)
    .await?;

    let order = find_order(&state, result.last_insert_rowid()).await?;
    tracing::info!("Created order {}", order.id);
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<OrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    if let Err(e) = validate_price(req.total_price) {
        return Err(ApiError::validation_field("totalPrice", e));
    }

    let result = sqlx::query(
        r#"
        UPDATE orders SET
            status = COALESCE(?, status),
            total_price = COALESCE(?, total_price),
            payment_method = COALESCE(?, payment_method),
            address = COALESCE(?, address),
            phone = COALESCE(?, phone),
            user_id = COALESCE(?, user_id),
            build_id = COALESCE(?, build_id)
        WHERE id = ?
        "#,
    )
    .bind(non_empty(&req.status))
    .bind(req.total_price)
    .bind(non_empty(&req.payment_method))
    .bind(non_empty(&req.address))
    .bind(req.phone.as_deref().and_then(parse_phone_number))
    .bind(req.user_id)
    .bind(req.build_id)
    .bind(id)
    .execute(&state.db)
    .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Order not found"));
    }

    Ok(Json(find_order(&state, id).await?))
}

pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Order not found"));
    }
    Ok(Json(DeleteResponse::ok()))
}
