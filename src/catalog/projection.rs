//! Public JSON shape of catalog items.
//!
//! Some keys are emitted under two spellings with the same value because
//! older front ends read one and newer ones the other.

use serde::Serialize;

use crate::db::{Category, ProductRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceView {
    pub price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub category_id: i64,
    pub category: Option<CategorySummary>,
    pub image_url1: Option<String>,
    #[serde(rename = "imageUrl1")]
    pub image_url1_camel: Option<String>,
    #[serde(rename = "productPrices")]
    pub product_prices: Vec<PriceView>,
    /// Stored specs text, verbatim
    pub specs: Option<String>,
    pub socket: Option<String>,
    #[serde(rename = "tdpWatt")]
    pub tdp_watt_camel: Option<i64>,
    pub tdp_watt: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithProducts {
    pub id: i64,
    pub name: String,
    pub products: Vec<ProductView>,
}

/// Shape a stored product for output
pub fn project(record: &ProductRecord) -> ProductView {
    let product = &record.product;
    ProductView {
        id: product.id,
        name: product.name.clone(),
        brand: product.brand.clone(),
        category_id: product.category_id,
        category: record.category.as_ref().map(CategorySummary::from),
        image_url1: product.image_url1.clone(),
        image_url1_camel: product.image_url1.clone(),
        product_prices: record
            .prices
            .iter()
            .map(|p| PriceView { price: p.price })
            .collect(),
        specs: product
            .specs
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(String::from),
        socket: product.socket.clone(),
        tdp_watt_camel: product.tdp_watt,
        tdp_watt: product.tdp_watt,
    }
}
