//! Product catalog: read projection and partial updates.

mod error;
pub mod patch;
pub mod projection;

pub use error::CatalogError;
pub use patch::{merge_patch, resolve_category, CategoryResolution};
pub use projection::{project, CategorySummary, CategoryWithProducts, PriceView, ProductView};

use std::sync::Arc;
use tracing::info;

use crate::db::{CatalogStore, ProductInput};

pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<ProductView>, CatalogError> {
        let records = self.store.list_products().await?;
        Ok(records.iter().map(project).collect())
    }

    pub async fn get(&self, id: i64) -> Result<ProductView, CatalogError> {
        let record = self
            .store
            .load_product(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;
        Ok(project(&record))
    }

    pub async fn create(&self, input: &ProductInput) -> Result<ProductView, CatalogError> {
        let resolution = resolve_category(self.store.as_ref(), input.category_id).await?;
        let product = patch::draft_product(input, resolution.category());
        let prices = input.prices().unwrap_or_default();

        let id = self.store.insert_product(&product, &prices).await?;
        info!("Created product {} in category {}", id, product.category_id);

        self.get(id).await
    }

    pub async fn update(&self, id: i64, input: &ProductInput) -> Result<ProductView, CatalogError> {
        let mut record = self
            .store
            .load_product(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;

        let prices = merge_patch(self.store.as_ref(), &mut record, input).await?;
        self.store
            .save_product(&record.product, prices.as_deref())
            .await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        if self.store.delete_product(id).await? {
            info!("Deleted product {}", id);
            Ok(())
        } else {
            Err(CatalogError::ProductNotFound)
        }
    }

    pub async fn category_with_products(
        &self,
        category_id: i64,
    ) -> Result<CategoryWithProducts, CatalogError> {
        let category = self
            .store
            .category_by_id(category_id)
            .await?
            .ok_or(CatalogError::CategoryNotFound)?;
        let records = self.store.products_by_category(category_id).await?;

        Ok(CategoryWithProducts {
            id: category.id,
            name: category.name,
            products: records.iter().map(project).collect(),
        })
    }
}
