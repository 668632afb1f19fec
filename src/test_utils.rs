//! Shared test utilities for the store catalog.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        category::{self, CategoryInput},
        product::{self, ProductInput},
    },
    entities,
    errors::Result,
    media::MediaStorage,
};
use rust_decimal_macros::dec;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Media storage rooted in a fresh temporary directory.
/// Keep the returned `TempDir` alive for as long as the storage is used.
pub fn test_media() -> Result<(TempDir, MediaStorage)> {
    let dir = tempfile::tempdir()?;
    let media = MediaStorage::new(dir.path(), "/media/");
    Ok((dir, media))
}

/// Lower-cases `name` and replaces spaces with hyphens ("Old Cola" -> "old-cola").
pub fn slugify(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "-")
}

/// Category input with an empty description.
pub fn category_input(name: &str, slug: &str) -> CategoryInput {
    CategoryInput {
        category_name: name.to_string(),
        slug: slug.to_string(),
        description: String::new(),
    }
}

/// Product input with sensible defaults.
///
/// # Defaults
/// * `description`: empty
/// * `price`: 9.99
/// * `stock`: 10
/// * `is_available`: true
/// * `image`: None
pub fn product_input(name: &str, slug: &str, category_id: i64) -> ProductInput {
    ProductInput {
        product_name: name.to_string(),
        slug: slug.to_string(),
        description: String::new(),
        price: dec!(9.99),
        stock: 10,
        is_available: true,
        category_id,
        image: None,
    }
}

/// Creates a test category whose slug is derived from its name.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    category::create_category(db, category_input(name, &slugify(name))).await
}

/// Creates a test product without an image; the slug is derived from the name.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    category_id: i64,
) -> Result<entities::product::Model> {
    let (_dir, media) = test_media()?;
    product::create_product(db, &media, product_input(name, &slugify(name), category_id)).await
}

/// Sets up a complete test environment with a "Drinks" category.
/// Returns (db, category) for common test scenarios.
pub async fn setup_with_category() -> Result<(DatabaseConnection, entities::category::Model)> {
    let db = setup_test_db().await?;
    let category = create_test_category(&db, "Drinks").await?;
    Ok((db, category))
}

/// Sets up a complete test environment with a category and a "Cola" product.
/// Returns (db, category, product) for product-related tests.
pub async fn setup_with_product() -> Result<(
    DatabaseConnection,
    entities::category::Model,
    entities::product::Model,
)> {
    let (db, category) = setup_with_category().await?;
    let product = create_test_product(&db, "Cola", category.id).await?;
    Ok((db, category, product))
}
