//! Supplier models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub website: Option<String>,
}

/// One product offered by a supplier, taken from its price entries
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SupplierProduct {
    pub product_id: i64,
    pub product_name: String,
    pub price: f64,
    pub supplier_link: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupplierWithProducts {
    pub id: i64,
    pub name: String,
    pub website: Option<String>,
    pub products: Vec<SupplierProduct>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SupplierRequest {
    pub name: Option<String>,
    pub website: Option<String>,
}
