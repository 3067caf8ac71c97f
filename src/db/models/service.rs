//! Repair service offerings.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEntity {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Option<i64>,
    pub unit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<i64>,
    pub unit: Option<String>,
}
