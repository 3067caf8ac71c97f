//! Service bookings.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{service_summary, user_summary, ServiceSummary, UserSummary};

/// Default status of a new booking
pub const DEFAULT_SERVICE_ORDER_STATUS: &str = "Pending";

/// Booking row joined with the booking account's name and the service name
#[derive(Debug, Clone, FromRow)]
pub struct ServiceOrderRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub user_fullname: Option<String>,
    pub service_id: Option<i64>,
    pub service_name: Option<String>,
    pub status: Option<String>,
    pub scheduled_date: Option<String>,
    pub total_price: Option<f64>,
    pub notes: Option<String>,
    pub address: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    pub user: Option<UserSummary>,
    pub service_id: Option<i64>,
    pub service: Option<ServiceSummary>,
    pub status: Option<String>,
    pub scheduled_date: Option<String>,
    pub total_price: Option<f64>,
    pub notes: Option<String>,
    pub address: Option<String>,
    pub created_at: Option<String>,
}

impl From<ServiceOrderRow> for ServiceOrderResponse {
    fn from(row: ServiceOrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            user: user_summary(row.user_id, row.user_fullname),
            service_id: row.service_id,
            service: service_summary(row.service_id, row.service_name),
            status: row.status,
            scheduled_date: row.scheduled_date,
            total_price: row.total_price,
            notes: row.notes,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrderRequest {
    pub user_id: Option<i64>,
    pub service_id: Option<i64>,
    pub status: Option<String>,
    pub scheduled_date: Option<String>,
    pub total_price: Option<f64>,
    pub notes: Option<String>,
    pub address: Option<String>,
}
