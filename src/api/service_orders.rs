//! Service booking endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{
    now_timestamp, DeleteResponse, ServiceOrderRequest, ServiceOrderResponse, ServiceOrderRow,
    DEFAULT_SERVICE_ORDER_STATUS,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_price, validate_scheduled_date};

const SERVICE_ORDER_SELECT: &str = r#"
    SELECT so.id, so.user_id, u.fullname AS user_fullname, so.service_id, s.name AS service_name,
           so.status, so.scheduled_date, so.total_price, so.notes, so.address, so.created_at
    FROM service_orders so
    LEFT JOIN users u ON u.id = so.user_id
    LEFT JOIN services s ON s.id = so.service_id
"#;

fn validate_request(req: &ServiceOrderRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_scheduled_date(&req.scheduled_date) {
        errors.add("scheduledDate", e);
    }
    if let Err(e) = validate_price(req.total_price) {
        errors.add("totalPrice", e);
    }

    errors.finish()
}

async fn find_service_order(state: &AppState, id: i64) -> Result<ServiceOrderResponse, ApiError> {
    let sql = format!("{} WHERE so.id = ?", SERVICE_ORDER_SELECT);
    let row = sqlx::query_as::<_, ServiceOrderRow>(&sql)
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Service order not found"))?;
    Ok(row.into())
}

pub async fn list_service_orders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ServiceOrderResponse>>, ApiError> {
    let sql = format!("{} ORDER BY so.id", SERVICE_ORDER_SELECT);
    let rows = sqlx::query_as::<_, ServiceOrderRow>(&sql)
        .fetch_all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_service_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ServiceOrderResponse>, ApiError> {
    Ok(Json(find_service_order(&state, id).await?))
}

pub async fn user_service_orders(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<ServiceOrderResponse>>, ApiError> {
    let sql = format!("{} WHERE so.user_id = ? ORDER BY so.id", SERVICE_ORDER_SELECT);
    let rows = sqlx::query_as::<_, ServiceOrderRow>(&sql)
        .bind(user_id)
        .fetch_all(&state.db)
        .await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn create_service_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ServiceOrderRequest>,
) -> Result<(StatusCode, Json<ServiceOrderResponse>), ApiError> {
    validate_request(&req)?;

    let result = sqlx::query(
        r#"
        INSERT INTO service_orders (user_id, service_id, status, scheduled_date, total_price, notes, address, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(req.user_id)
    .bind(req.service_id)
    .bind(req.status.as_deref().unwrap_or(DEFAULT_SERVICE_ORDER_STATUS))
    .bind(&req.scheduled_date)
    .bind(req.total_price)
    .bind(&req.notes)
    .bind(&req.address)
    .bind(now_timestamp())
    .execute(&state.db)
    .await?;

    let order = find_service_order(&state, result.last_insert_rowid()).await?;
    tracing::info!("Created service order {}", order.id);
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_service_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<ServiceOrderRequest>,
) -> Result<Json<ServiceOrderResponse>, ApiError> {
    validate_request(&req)?;

    let result = sqlx::query(
        r#"
        UPDATE service_orders SET
            user_id = COALESCE(?, user_id),
            service_id = COALESCE(?, service_id),
            status = COALESCE(?, status),
            scheduled_date = COALESCE(?, scheduled_date),
            total_price = COALESCE(?, total_price),
            notes = COALESCE(?, notes),
            address = COALESCE(?, address)
        WHERE id = ?
        "#,
    )
    .bind(req.user_id)
    .bind(req.service_id)
    .bind(&req.status)
    .bind(&req.scheduled_date)
    .bind(req.total_price)
    .bind(&req.notes)
    .bind(&req.address)
    .bind(id)
    .execute(&state.db)
    .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Service order not found"));
    }

    Ok(Json(find_service_order(&state, id).await?))
}

pub async fn delete_service_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM service_orders WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Service order not found"));
    }
    Ok(Json(DeleteResponse::ok()))
}
