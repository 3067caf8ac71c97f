use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("Category not found")]
    CategoryNotFound,

    #[error("Lỗi cơ sở dữ liệu: {0}")]
    Storage(#[from] sqlx::Error),
}
