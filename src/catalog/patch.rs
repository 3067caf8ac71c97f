//! Applying create and update payloads to products.

use tracing::warn;

use super::CatalogError;
use crate::db::{CatalogStore, Category, Product, ProductInput, ProductRecord};

/// Default name of a product created without one
pub const DEFAULT_PRODUCT_NAME: &str = "Unnamed";
/// Default brand of a product created without one
pub const DEFAULT_PRODUCT_BRAND: &str = "Unknown";

/// How the category of a new product was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryResolution {
    /// The requested id exists
    Resolved(Category),
    /// The requested id was missing or unknown; the first category was used
    FallbackDefault(Category),
}

impl CategoryResolution {
    pub fn category(&self) -> &Category {
        match self {
            CategoryResolution::Resolved(c) | CategoryResolution::FallbackDefault(c) => c,
        }
    }
}

/// Pick the category for a new product
pub async fn resolve_category(
    store: &dyn CatalogStore,
    requested: Option<i64>,
) -> Result<CategoryResolution, CatalogError> {
    if let Some(id) = requested {
        if let Some(category) = store.category_by_id(id).await? {
            return Ok(CategoryResolution::Resolved(category));
        }
    }

    let fallback = store
        .first_category()
        .await?
        .ok_or(CatalogError::CategoryNotFound)?;
    warn!(
        "Category {:?} not found, falling back to {} ({})",
        requested, fallback.id, fallback.name
    );
    Ok(CategoryResolution::FallbackDefault(fallback))
}

/// Build an unsaved product from a create payload
pub fn draft_product(input: &ProductInput, category: &Category) -> Product {
    let mut product = Product::draft(category.id);
    product.name = input
        .name
        .clone()
        .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string());
    product.brand = input
        .brand
        .clone()
        .unwrap_or_else(|| DEFAULT_PRODUCT_BRAND.to_string());
    product.image_url1 = Some(input.image_url().unwrap_or_default().to_string());
    product.socket = input.socket.clone();
    product.tdp_watt = input.tdp();
    product.specs = input.specs_json();
    product
}

/// Apply an update payload onto a loaded product.
///
/// Only present, non-null fields change. A category id that is not positive
/// or does not resolve is ignored. A price list, when sent, replaces the
/// existing entries; the replacement list is returned for the store to
/// persist.
pub async fn merge_patch(
    store: &dyn CatalogStore,
    record: &mut ProductRecord,
    input: &ProductInput,
) -> Result<Option<Vec<f64>>, CatalogError> {
    let product = &mut record.product;

    if let Some(name) = &input.name {
        product.name = name.clone();
    }
    if let Some(brand) = &input.brand {
        product.brand = brand.clone();
    }
    if let Some(image_url) = input.image_url() {
        product.image_url1 = Some(image_url.to_string());
    }
    if let Some(socket) = &input.socket {
        product.socket = Some(socket.clone());
    }
    if let Some(tdp) = input.tdp() {
        product.tdp_watt = Some(tdp);
    }

    if let Some(id) = input.category_id.filter(|id| *id > 0) {
        match store.category_by_id(id).await? {
            Some(category) => {
                product.category_id = category.id;
                record.category = Some(category);
            }
            None => warn!("Ignoring unknown category {} for product {}", id, product.id),
        }
    }

    if let Some(specs) = input.specs_json() {
        product.specs = Some(specs);
    }

    Ok(input.prices())
}
