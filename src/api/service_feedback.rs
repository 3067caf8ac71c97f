//! Feedback on service bookings.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{DeleteResponse, ServiceFeedbackRequest, ServiceFeedbackResponse, ServiceFeedbackRow};
use crate::AppState;

use super::error::ApiError;
use super::validation::validate_rating;

const FEEDBACK_SELECT: &str = r#"
    SELECT sf.id, sf.service_order_id, so.status AS service_order_status, so.id AS joined_order_id,
           sf.user_id, u.fullname AS user_fullname, sf.rating, sf.comments
    FROM service_feedbacks sf
    LEFT JOIN service_orders so ON so.id = sf.service_order_id
    LEFT JOIN users u ON u.id = sf.user_id
"#;

async fn find_feedback(state: &AppState, id: i64) -> Result<ServiceFeedbackResponse, ApiError> {
    let sql = format!("{} WHERE sf.id = ?", FEEDBACK_SELECT);
    let row = sqlx::query_as::<_, ServiceFeedbackRow>(&sql)
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Service feedback not found"))?;
    Ok(row.into())
}

async fn list_where(
    state: &AppState,
    filter: &str,
    value: Option<i64>,
) -> Result<Vec<ServiceFeedbackResponse>, ApiError> {
    let sql = format!("{} {} ORDER BY sf.id", FEEDBACK_SELECT, filter);
    let mut query = sqlx::query_as::<_, ServiceFeedbackRow>(&sql);
    if let Some(value) = value {
        query = query.bind(value);
    }
    let rows = query.fetch_all(&state.db).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn list_feedback(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ServiceFeedbackResponse>>, ApiError> {
    Ok(Json(list_where(&state, "", None).await?))
}

pub async fn get_feedback(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ServiceFeedbackResponse>, ApiError> {
    Ok(Json(find_feedback(&state, id).await?))
}

pub async fn service_order_feedback(
    State(state): State<Arc<AppState>>,
    Path(service_order_id): Path<i64>,
) -> Result<Json<Vec<ServiceFeedbackResponse>>, ApiError> {
    Ok(Json(
        list_where(&state, "WHERE sf.service_order_id = ?", Some(service_order_id)).await?,
    ))
}

pub async fn user_feedback(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<ServiceFeedbackResponse>>, ApiError> {
    Ok(Json(
        list_where(&state, "WHERE sf.user_id = ?", Some(user_id)).await?,
    ))
}

pub async fn create_feedback(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ServiceFeedbackRequest>,
) -> Result<(StatusCode, Json<ServiceFeedbackResponse>), ApiError> {
    if let Err(e) = validate_rating(req.rating) {
        return Err(ApiError::validation_field("rating", e));
    }

    let result = sqlx::query(
        "INSERT INTO service_feedbacks (service_order_id, user_id, rating, comments) VALUES (?, ?, ?, ?)",
    )
    .bind(req.service_order_id)
    .bind(req.user_id)
    .bind(req.rating)
    .bind(&req.comments)
    .execute(&state.db)
    .await?;

    let feedback = find_feedback(&state, result.last_insert_rowid()).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

pub async fn update_feedback(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<ServiceFeedbackRequest>,
) -> Result<Json<ServiceFeedbackResponse>, ApiError> {
    if let Err(e) = validate_rating(req.rating) {
        return Err(ApiError::validation_field("rating", e));
    }

    let result = sqlx::query(
        r#"
        UPDATE service_feedbacks SET
            service_order_id = COALESCE(?, service_order_id),
            user_id = COALESCE(?, user_id),
            rating = COALESCE(?, rating),
            comments = COALESCE(?, comments)
        WHERE id = ?
        "#,
    )
    .bind(req.service_order_id)
    .bind(req.user_id)
    .bind(req.rating)
    .bind(&req.comments)
    .bind(id)
    .execute(&state.db)
    .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Service feedback not found"));
    }

    Ok(Json(find_feedback(&state, id).await?))
}

pub async fn delete_feedback(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM service_feedbacks WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Service feedback not found"));
    }
    Ok(Json(DeleteResponse::ok()))
}
