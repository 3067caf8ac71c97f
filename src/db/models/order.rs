//! Checkout orders for saved builds.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Status given to orders created without one
pub const DEFAULT_ORDER_STATUS: &str = "PAID";

#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: Option<i64>,
    pub build_id: Option<i64>,
    pub status: Option<String>,
    pub total_price: Option<f64>,
    pub payment_method: Option<String>,
    /// Stored as a number; leading zeros are lost
    pub phone: Option<i64>,
    pub address: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    pub build_id: Option<i64>,
    pub status: Option<String>,
    pub total_price: Option<f64>,
    pub payment_method: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: Option<String>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            build_id: order.build_id,
            status: order.status,
            total_price: order.total_price,
            payment_method: order.payment_method,
            phone: order.phone.map(|p| p.to_string()),
            address: order.address,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub user_id: Option<i64>,
    pub build_id: Option<i64>,
    pub status: Option<String>,
    pub total_price: Option<f64>,
    pub payment_method: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Keep only the digits of a phone number and read them as an integer.
///
/// Returns None when there are no digits or they overflow.
pub fn parse_phone_number(phone: &str) -> Option<i64> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}
