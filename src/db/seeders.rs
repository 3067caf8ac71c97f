//! Database seeders for built-in data
//!
//! Each seeder only writes into an empty table, so running them on every
//! startup is safe.

use anyhow::{anyhow, Result};
use sqlx::SqlitePool;
use tracing::info;

use super::models::now_timestamp;
use crate::crypto::hash_password;

/// Default part categories, in display order
pub const DEFAULT_CATEGORIES: [&str; 12] = [
    "CPU",
    "GPU",
    "RAM",
    "Storage",
    "PSU",
    "Case",
    "Monitor",
    "Keyboard",
    "Mouse",
    "Headset",
    "CPUCooler",
    "Mainboard",
];

/// Seed the default categories when none exist
pub async fn seed_categories(pool: &SqlitePool) -> Result<()> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for name in DEFAULT_CATEGORIES {
        sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    info!("Seeded {} default categories", DEFAULT_CATEGORIES.len());
    Ok(())
}

/// Seed a demo account when no account exists.
///
/// The password goes through the same hashing as registration.
pub async fn seed_demo_user(pool: &SqlitePool) -> Result<()> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(());
    }

    let password_hash =
        hash_password("demo123").map_err(|e| anyhow!("Failed to hash demo password: {}", e))?;

    sqlx::query(
        r#"
        INSERT INTO users (username, fullname, email, password, phone, dob, address, role, created_at)
        VALUES ('demo', 'Demo User', 'demo@example.com', ?, '0999999999', '1990-01-01', 'HCM', 'User', ?)
        "#,
    )
    .bind(&password_hash)
    .bind(now_timestamp())
    .execute(pool)
    .await?;

    info!("Seeded demo account demo@example.com");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::verify_password;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_seeders_only_fill_empty_tables() {
        let pool = test_pool().await;
        seed_categories(&pool).await.unwrap();
        seed_categories(&pool).await.unwrap();
        seed_demo_user(&pool).await.unwrap();
        seed_demo_user(&pool).await.unwrap();

        let (categories,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(categories, 12);

        let (users,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(users, 1);
    }

    #[tokio::test]
    async fn test_demo_password_is_hashed() {
        let pool = test_pool().await;
        seed_demo_user(&pool).await.unwrap();

        let (stored,): (String,) =
            sqlx::query_as("SELECT password FROM users WHERE email = 'demo@example.com'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_ne!(stored, "demo123");
        assert!(verify_password("demo123", &stored));
    }
}
