//! Product and price-entry models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::category::Category;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    pub brand: String,
    pub model: Option<String>,
    /// Opaque specification payload, stored and returned verbatim
    pub specs: Option<String>,
    pub tdp_watt: Option<i64>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub socket: Option<String>,
    pub capacity: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub product_type: Option<String>,
    pub image_url1: Option<String>,
    pub image_url2: Option<String>,
    pub image_url3: Option<String>,
    pub image_url4: Option<String>,
    pub image_url5: Option<String>,
    pub created_at: Option<String>,
}

impl Product {
    /// A product that has not been persisted yet (id 0)
    pub fn draft(category_id: i64) -> Self {
        Self {
            id: 0,
            name: String::new(),
            category_id,
            brand: String::new(),
            model: None,
            specs: None,
            tdp_watt: None,
            color: None,
            size: None,
            socket: None,
            capacity: None,
            product_type: None,
            image_url1: None,
            image_url2: None,
            image_url3: None,
            image_url4: None,
            image_url5: None,
            created_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ProductPrice {
    pub id: i64,
    pub product_id: i64,
    pub price: f64,
    pub supplier_id: Option<i64>,
    pub supplier_link: Option<String>,
    pub updated_at: Option<String>,
}

/// A product loaded together with its category and price entries
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub product: Product,
    /// None when the category row could not be loaded
    pub category: Option<Category>,
    pub prices: Vec<ProductPrice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceInput {
    pub price: f64,
}

/// Create/update payload for products.
///
/// Every field is optional; absent and null both mean "not provided".
/// Both historical spellings of the image and TDP keys are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category_id: Option<i64>,
    pub image_url1: Option<String>,
    #[serde(rename = "imageUrl1")]
    pub image_url1_camel: Option<String>,
    pub socket: Option<String>,
    #[serde(rename = "tdpWatt")]
    pub tdp_watt_camel: Option<i64>,
    pub tdp_watt: Option<i64>,
    #[serde(rename = "productPrices")]
    pub product_prices: Option<Vec<PriceInput>>,
    pub specs: Option<serde_json::Value>,
}

impl ProductInput {
    /// Image URL from whichever spelling was sent, snake_case first
    pub fn image_url(&self) -> Option<&str> {
        self.image_url1
            .as_deref()
            .or(self.image_url1_camel.as_deref())
    }

    /// TDP from whichever spelling was sent, camelCase first
    pub fn tdp(&self) -> Option<i64> {
        self.tdp_watt_camel.or(self.tdp_watt)
    }

    /// Price list as bare prices, if one was sent
    pub fn prices(&self) -> Option<Vec<f64>> {
        self.product_prices
            .as_ref()
            .map(|list| list.iter().map(|p| p.price).collect())
    }

    /// Serialized specs payload, if one was sent
    pub fn specs_json(&self) -> Option<String> {
        self.specs.as_ref().map(|v| v.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_accepts_both_spellings() {
        let input: ProductInput =
            serde_json::from_str(r#"{"imageUrl1": "b.png", "tdp_watt": 95}"#).unwrap();
        assert_eq!(input.image_url(), Some("b.png"));
        assert_eq!(input.tdp(), Some(95));

        let input: ProductInput = serde_json::from_str(
            r#"{"image_url1": "a.png", "imageUrl1": "b.png", "tdpWatt": 65, "tdp_watt": 95}"#,
        )
        .unwrap();
        assert_eq!(input.image_url(), Some("a.png"));
        assert_eq!(input.tdp(), Some(65));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let input: ProductInput =
            serde_json::from_str(r#"{"name": null, "specs": null, "productPrices": null}"#).unwrap();
        assert!(input.name.is_none());
        assert!(input.specs_json().is_none());
        assert!(input.prices().is_none());
    }

    #[test]
    fn test_specs_serialized() {
        let input: ProductInput =
            serde_json::from_str(r#"{"specs": {"cores": 8, "boost": "5.0GHz"}}"#).unwrap();
        let specs = input.specs_json().unwrap();
        let back: serde_json::Value = serde_json::from_str(&specs).unwrap();
        assert_eq!(back["cores"], 8);
    }
}
