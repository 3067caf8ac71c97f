//! Saved PC build endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::db::{
    now_timestamp, BuildItemView, BuildRequest, BuildResponse, BuildRow, BuildUpdateRequest,
    DeleteResponse,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_price, validate_quantity};

const BUILD_SELECT: &str = r#"
    SELECT b.id, b.user_id, u.fullname AS user_fullname, b.name, b.total_price, b.created_at
    FROM builds b
    LEFT JOIN users u ON u.id = b.user_id
"#;

async fn load_items(db: &SqlitePool, build_id: i64) -> Result<Vec<BuildItemView>, sqlx::Error> {
    sqlx::query_as::<_, BuildItemView>(
        r#"
        SELECT bi.id, bi.product_price_id, bi.quantity, pp.price,
               p.id AS product_id, p.name AS product_name
        FROM build_items bi
        LEFT JOIN product_prices pp ON pp.id = bi.product_price_id
        LEFT JOIN products p ON p.id = pp.product_id
        WHERE bi.build_id = ?
        ORDER BY bi.id
        "#,
    )
    .bind(build_id)
    .fetch_all(db)
    .await
}

async fn with_items(db: &SqlitePool, rows: Vec<BuildRow>) -> Result<Vec<BuildResponse>, sqlx::Error> {
    let mut builds = Vec::with_capacity(rows.len());
    for row in rows {
        let items = load_items(db, row.id).await?;
        builds.push(BuildResponse::from_parts(row, items));
    }
    Ok(builds)
}

async fn find_build(state: &AppState, id: i64) -> Result<BuildResponse, ApiError> {
    let sql = format!("{} WHERE b.id = ?", BUILD_SELECT);
    let row = sqlx::query_as::<_, BuildRow>(&sql)
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Build not found"))?;
    let items = load_items(&state.db, row.id).await?;
    Ok(BuildResponse::from_parts(row, items))
}

pub async fn list_builds(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BuildResponse>>, ApiError> {
    let sql = format!("{} ORDER BY b.id", BUILD_SELECT);
    let rows = sqlx::query_as::<_, BuildRow>(&sql)
        .fetch_all(&state.db)
        .await?;
    Ok(Json(with_items(&state.db, rows).await?))
}

pub async fn get_build(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<BuildResponse>, ApiError> {
    Ok(Json(find_build(&state, id).await?))
}

pub async fn user_builds(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<BuildResponse>>, ApiError> {
    let sql = format!("{} WHERE b.user_id = ? ORDER BY b.id", BUILD_SELECT);
    let rows = sqlx::query_as::<_, BuildRow>(&sql)
        .bind(user_id)
        .fetch_all(&state.db)
        .await?;
    Ok(Json(with_items(&state.db, rows).await?))
}

/// Create a build together with its items in one transaction
pub async fn create_build(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BuildRequest>,
) -> Result<(StatusCode, Json<BuildResponse>), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_price(req.total_price) {
        errors.add("totalPrice", e);
    }
    for item in &req.items {
        if let Err(e) = validate_quantity(item.quantity) {
            errors.add("items", e);
        }
    }
    errors.finish()?;

    let mut tx = state.db.begin().await?;

    let result = sqlx::query(
        "INSERT INTO builds (user_id, name, total_price, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(req.user_id)
    .bind(req.name.as_deref().unwrap_or_default())
    .bind(req.total_price)
    .bind(now_timestamp())
    .execute(&mut *tx)
    .await?;
    let build_id = result.last_insert_rowid();

    for item in &req.items {
        sqlx::query(
            "INSERT INTO build_items (build_id, product_price_id, quantity) VALUES (?, ?, ?)",
        )
        .bind(build_id)
        .bind(item.product_price_id)
        .bind(item.quantity.unwrap_or(1))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::info!("Created build {} with {} items", build_id, req.items.len());
    let build = find_build(&state, build_id).await?;
    Ok((StatusCode::CREATED, Json(build)))
}

/// Update a build's name, total and owner. Blank names are ignored.
pub async fn update_build(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<BuildUpdateRequest>,
) -> Result<Json<BuildResponse>, ApiError> {
    if let Err(e) = validate_price(req.total_price) {
        return Err(ApiError::validation_field("totalPrice", e));
    }

    let name = req.name.as_deref().filter(|n| !n.is_empty());
    let result = sqlx::query(
        r#"
        UPDATE builds SET
            name = COALESCE(?, name),
            total_price = COALESCE(?, total_price),
            user_id = COALESCE(?, user_id)
        WHERE id = ?
        "#,
    )
    .bind(name)
    .bind(req.total_price)
    .bind(req.user_id)
    .bind(id)
    .execute(&state.db)
    .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Build not found"));
    }

    Ok(Json(find_build(&state, id).await?))
}

pub async fn delete_build(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM builds WHERE id = ?")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Build not found"));
    }
    Ok(Json(DeleteResponse::ok()))
}
