//! Feedback left on service bookings.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{user_summary, ServiceOrderSummary, UserSummary};

#[derive(Debug, Clone, FromRow)]
pub struct ServiceFeedbackRow {
    pub id: i64,
    pub service_order_id: Option<i64>,
    pub service_order_status: Option<String>,
    pub joined_order_id: Option<i64>,
    pub user_id: Option<i64>,
    pub user_fullname: Option<String>,
    pub rating: Option<i64>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFeedbackResponse {
    pub id: i64,
    pub service_order_id: Option<i64>,
    pub service_order: Option<ServiceOrderSummary>,
    pub user_id: Option<i64>,
    pub user: Option<UserSummary>,
    pub rating: Option<i64>,
    pub comments: Option<String>,
}

impl From<ServiceFeedbackRow> for ServiceFeedbackResponse {
    fn from(row: ServiceFeedbackRow) -> Self {
        let service_order = row.joined_order_id.map(|id| ServiceOrderSummary {
            id,
            status: row.service_order_status,
        });
        Self {
            id: row.id,
            service_order_id: row.service_order_id,
            service_order,
            user_id: row.user_id,
            user: user_summary(row.user_id, row.user_fullname),
            rating: row.rating,
            comments: row.comments,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceFeedbackRequest {
    pub service_order_id: Option<i64>,
    pub user_id: Option<i64>,
    pub rating: Option<i64>,
    pub comments: Option<String>,
}
