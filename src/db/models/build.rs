//! Saved PC builds: a named list of chosen price entries.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{user_summary, UserSummary};

#[derive(Debug, Clone, FromRow)]
pub struct BuildRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub user_fullname: Option<String>,
    pub name: String,
    pub total_price: Option<f64>,
    pub created_at: Option<String>,
}

/// A build line joined with its price entry and product
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BuildItemView {
    pub id: i64,
    pub product_price_id: i64,
    pub quantity: i64,
    pub price: Option<f64>,
    pub product_id: Option<i64>,
    pub product_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    pub user: Option<UserSummary>,
    pub name: String,
    pub total_price: Option<f64>,
    pub created_at: Option<String>,
    pub items: Vec<BuildItemView>,
}

impl BuildResponse {
    pub fn from_parts(row: BuildRow, items: Vec<BuildItemView>) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            user: user_summary(row.user_id, row.user_fullname),
            name: row.name,
            total_price: row.total_price,
            created_at: row.created_at,
            items,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildItemInput {
    pub product_price_id: i64,
    pub quantity: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub total_price: Option<f64>,
    #[serde(default)]
    pub items: Vec<BuildItemInput>,
}

/// Update payload; items are not editable after creation
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildUpdateRequest {
    pub user_id: Option<i64>,
    pub name: Option<String>,
    pub total_price: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_items_default_empty() {
        let req: BuildRequest = serde_json::from_str(r#"{"name": "Gaming"}"#).unwrap();
        assert!(req.items.is_empty());

        let req: BuildRequest = serde_json::from_str(
            r#"{"userId": 3, "name": "Office", "items": [{"productPriceId": 7}, {"productPriceId": 8, "quantity": 2}]}"#,
        )
        .unwrap();
        assert_eq!(req.user_id, Some(3));
        assert_eq!(req.items[0].quantity, None);
        assert_eq!(req.items[1].quantity, Some(2));
    }
}
