//! Storage collaborators for the account and catalog components.
//!
//! The components only see these traits; `SqliteStore` is the one
//! implementation and is shared behind an `Arc`.

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::collections::HashMap;

use super::models::{now_timestamp, Category, NewUser, Product, ProductPrice, ProductRecord, User};

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Exact, case-sensitive email lookup
    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error>;
    async fn insert_user(&self, user: NewUser) -> Result<User, sqlx::Error>;
    /// First account (lowest id) whose email, phone or username equals `identifier`
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, sqlx::Error>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, sqlx::Error>;
    /// Persist the mutable profile fields of an existing account
    async fn save_user(&self, user: &User) -> Result<(), sqlx::Error>;
    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error>;
    /// Returns false when no account had that id
    async fn delete_user(&self, id: i64) -> Result<bool, sqlx::Error>;
    async fn count_users(&self) -> Result<i64, sqlx::Error>;
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn category_by_id(&self, id: i64) -> Result<Option<Category>, sqlx::Error>;
    /// Lowest-id category, used as the fallback for unresolvable ids
    async fn first_category(&self) -> Result<Option<Category>, sqlx::Error>;
    async fn load_product(&self, id: i64) -> Result<Option<ProductRecord>, sqlx::Error>;
    async fn list_products(&self) -> Result<Vec<ProductRecord>, sqlx::Error>;
    async fn products_by_category(&self, category_id: i64)
        -> Result<Vec<ProductRecord>, sqlx::Error>;
    /// Insert a product and one price entry per price; returns the new id
    async fn insert_product(&self, product: &Product, prices: &[f64]) -> Result<i64, sqlx::Error>;
    /// Update a product's columns. When `prices` is given the existing price
    /// entries are replaced by it.
    async fn save_product(
        &self,
        product: &Product,
        prices: Option<&[f64]>,
    ) -> Result<(), sqlx::Error>;
    async fn delete_product(&self, id: i64) -> Result<bool, sqlx::Error>;
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn categories_by_id(&self) -> Result<HashMap<i64, Category>, sqlx::Error> {
        let categories: Vec<Category> = sqlx::query_as("SELECT id, name FROM categories")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories.into_iter().map(|c| (c.id, c)).collect())
    }
}

/// Attach categories and price entries to their products, keeping product order
fn assemble(
    products: Vec<Product>,
    categories: &HashMap<i64, Category>,
    prices: Vec<ProductPrice>,
) -> Vec<ProductRecord> {
    let mut prices_by_product: HashMap<i64, Vec<ProductPrice>> = HashMap::new();
    for price in prices {
        prices_by_product
            .entry(price.product_id)
            .or_default()
            .push(price);
    }

    products
        .into_iter()
        .map(|product| ProductRecord {
            category: categories.get(&product.category_id).cloned(),
            prices: prices_by_product.remove(&product.id).unwrap_or_default(),
            product,
        })
        .collect()
}

#[async_trait]
impl AccountStore for SqliteStore {
    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ? LIMIT 1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, fullname, email, password, phone, dob, address, role, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.fullname)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(&user.dob)
        .bind(&user.address)
        .bind(&user.role)
        .bind(&user.created_at)
        .execute(&self.pool)
        .await?;

        sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as(
            "SELECT * FROM users WHERE email = ? OR phone = ? OR username = ? ORDER BY id LIMIT 1",
        )
        .bind(identifier)
        .bind(identifier)
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn save_user(&self, user: &User) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET fullname = ?, phone = ?, dob = ?, address = ? WHERE id = ?")
            .bind(&user.fullname)
            .bind(&user.phone)
            .bind(&user.dob)
            .bind(&user.address)
            .bind(user.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    async fn delete_user(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_users(&self) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn category_by_id(&self, id: i64) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as("SELECT id, name FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn first_category(&self) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as("SELECT id, name FROM categories ORDER BY id LIMIT 1")
            .fetch_optional(&self.pool)
            .await
    }

    async fn load_product(&self, id: i64) -> Result<Option<ProductRecord>, sqlx::Error> {
        let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(product) = product else {
            return Ok(None);
        };

        let category = self.category_by_id(product.category_id).await?;
        let prices: Vec<ProductPrice> =
            sqlx::query_as("SELECT * FROM product_prices WHERE product_id = ? ORDER BY id")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;

        Ok(Some(ProductRecord {
            product,
            category,
            prices,
        }))
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let products: Vec<Product> = sqlx::query_as("SELECT * FROM products ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        let prices: Vec<ProductPrice> = sqlx::query_as("SELECT * FROM product_prices ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        let categories = self.categories_by_id().await?;
        Ok(assemble(products, &categories, prices))
    }

    async fn products_by_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        let products: Vec<Product> =
            sqlx::query_as("SELECT * FROM products WHERE category_id = ? ORDER BY id")
                .bind(category_id)
                .fetch_all(&self.pool)
                .await?;
        let prices: Vec<ProductPrice> = sqlx::query_as(
            r#"
            SELECT pp.* FROM product_prices pp
            JOIN products p ON p.id = pp.product_id
            WHERE p.category_id = ?
            ORDER BY pp.id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;
        let categories = self.categories_by_id().await?;
        Ok(assemble(products, &categories, prices))
    }

    async fn insert_product(&self, product: &Product, prices: &[f64]) -> Result<i64, sqlx::Error> {
        let now = now_timestamp();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                name, category_id, brand, model, specs, tdp_watt, color, size, socket,
                capacity, type, image_url1, image_url2, image_url3, image_url4, image_url5, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.name)
        .bind(product.category_id)
        .bind(&product.brand)
        .bind(&product.model)
        .bind(&product.specs)
        .bind(product.tdp_watt)
        .bind(&product.color)
        .bind(&product.size)
        .bind(&product.socket)
        .bind(&product.capacity)
        .bind(&product.product_type)
        .bind(&product.image_url1)
        .bind(&product.image_url2)
        .bind(&product.image_url3)
        .bind(&product.image_url4)
        .bind(&product.image_url5)
        .bind(product.created_at.as_deref().unwrap_or(&now))
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        for price in prices {
            sqlx::query("INSERT INTO product_prices (product_id, price, updated_at) VALUES (?, ?, ?)")
                .bind(id)
                .bind(price)
                .bind(&now)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    async fn save_product(
        &self,
        product: &Product,
        prices: Option<&[f64]>,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE products SET
                name = ?, category_id = ?, brand = ?, model = ?, specs = ?, tdp_watt = ?,
                color = ?, size = ?, socket = ?, capacity = ?, type = ?,
                image_url1 = ?, image_url2 = ?, image_url3 = ?, image_url4 = ?, image_url5 = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(product.category_id)
        .bind(&product.brand)
        .bind(&product.model)
        .bind(&product.specs)
        .bind(product.tdp_watt)
        .bind(&product.color)
        .bind(&product.size)
        .bind(&product.socket)
        .bind(&product.capacity)
        .bind(&product.product_type)
        .bind(&product.image_url1)
        .bind(&product.image_url2)
        .bind(&product.image_url3)
        .bind(&product.image_url4)
        .bind(&product.image_url5)
        .bind(product.id)
        .execute(&mut *tx)
        .await?;

        if let Some(prices) = prices {
            sqlx::query("DELETE FROM product_prices WHERE product_id = ?")
                .bind(product.id)
                .execute(&mut *tx)
                .await?;
            let now = now_timestamp();
            for price in prices {
                sqlx::query(
                    "INSERT INTO product_prices (product_id, price, updated_at) VALUES (?, ?, ?)",
                )
                .bind(product.id)
                .bind(price)
                .bind(&now)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_product(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{seed_categories, test_pool};

    fn new_user(email: &str, phone: Option<&str>) -> NewUser {
        NewUser {
            username: email.to_string(),
            fullname: "Test".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            phone: phone.map(String::from),
            dob: None,
            address: None,
            role: "User".to_string(),
            created_at: now_timestamp(),
        }
    }

    #[tokio::test]
    async fn test_identifier_matches_email_phone_or_username() {
        let store = SqliteStore::new(test_pool().await);
        let first = store
            .insert_user(new_user("a@test.com", Some("0912345678")))
            .await
            .unwrap();
        store.insert_user(new_user("b@test.com", None)).await.unwrap();

        let by_phone = store.find_by_identifier("0912345678").await.unwrap().unwrap();
        assert_eq!(by_phone.id, first.id);
        let by_email = store.find_by_identifier("b@test.com").await.unwrap().unwrap();
        assert_eq!(by_email.email, "b@test.com");
        assert!(store.find_by_identifier("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_email_exists_is_case_sensitive() {
        let store = SqliteStore::new(test_pool().await);
        store.insert_user(new_user("a@test.com", None)).await.unwrap();
        assert!(store.email_exists("a@test.com").await.unwrap());
        assert!(!store.email_exists("A@test.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_price_list_replacement() {
        let pool = test_pool().await;
        seed_categories(&pool).await.unwrap();
        let store = SqliteStore::new(pool);

        let mut product = Product::draft(1);
        product.name = "Ryzen 5".to_string();
        product.brand = "AMD".to_string();
        let id = store.insert_product(&product, &[100.0, 120.0]).await.unwrap();

        let record = store.load_product(id).await.unwrap().unwrap();
        assert_eq!(record.prices.len(), 2);
        assert_eq!(record.category.unwrap().name, "CPU");

        store
            .save_product(&record.product, Some(&[99.0]))
            .await
            .unwrap();
        let record = store.load_product(id).await.unwrap().unwrap();
        assert_eq!(record.prices.len(), 1);
        assert_eq!(record.prices[0].price, 99.0);

        // No price list leaves the entries alone
        store.save_product(&record.product, None).await.unwrap();
        assert_eq!(store.load_product(id).await.unwrap().unwrap().prices.len(), 1);

        assert_eq!(store.products_by_category(1).await.unwrap().len(), 1);
        assert!(store.products_by_category(2).await.unwrap().is_empty());

        assert!(store.delete_product(id).await.unwrap());
        assert!(!store.delete_product(id).await.unwrap());
    }
}
