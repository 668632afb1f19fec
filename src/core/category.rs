//! Category business logic - creating, looking up and removing categories.
//!
//! Removing a category removes its products in the same transaction.

use crate::{
    config::catalog::CategoryConfig,
    entities::{Category, Product, category, product},
    errors::{Error, Result},
    validation::validate_slug,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

/// Values for a new category
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryInput {
    /// Display name, 1-50 characters
    #[validate(length(min = 1, max = 50))]
    pub category_name: String,
    /// URL-safe identifier, 1-100 characters
    #[validate(length(min = 1, max = 100), custom(function = "validate_slug"))]
    pub slug: String,
    /// Optional description, up to 255 characters
    #[serde(default)]
    #[validate(length(max = 255))]
    pub description: String,
}

impl From<&CategoryConfig> for CategoryInput {
    fn from(config: &CategoryConfig) -> Self {
        Self {
            category_name: config.category_name.clone(),
            slug: config.slug.clone(),
            description: config.description.clone(),
        }
    }
}

/// Retrieves all categories, ordered alphabetically by name.
pub async fn get_all_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::CategoryName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by its slug.
pub async fn get_category_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<Option<category::Model>> {
    Category::find()
        .filter(category::Column::Slug.eq(slug))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a category by its ID.
pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Option<category::Model>> {
    Category::find_by_id(category_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a category after checking field lengths and the slug format.
///
/// # Errors
/// Returns an error if:
/// - A field is blank, too long, or the slug is not URL-safe
/// - The name or slug is already taken
/// - The database insert operation fails
#[instrument(skip(db))]
pub async fn create_category(
    db: &DatabaseConnection,
    input: CategoryInput,
) -> Result<category::Model> {
    let input = CategoryInput {
        category_name: input.category_name.trim().to_string(),
        slug: input.slug.trim().to_string(),
        description: input.description.trim().to_string(),
    };
    input.validate()?;

    let category = category::ActiveModel {
        category_name: Set(input.category_name),
        slug: Set(input.slug),
        description: Set(input.description),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(id = category.id, slug = %category.slug, "Created category");
    Ok(category)
}

/// Deletes a category together with all of its products.
///
/// Returns the number of products removed.
///
/// # Errors
/// Returns [`Error::CategoryNotFound`] if no category has this ID, or a database error.
#[instrument(skip(db))]
pub async fn delete_category(db: &DatabaseConnection, category_id: i64) -> Result<u64> {
    let txn = db.begin().await?;

    let removed = Product::delete_many()
        .filter(product::Column::CategoryId.eq(category_id))
        .exec(&txn)
        .await?
        .rows_affected;

    let deleted = Category::delete_by_id(category_id).exec(&txn).await?;
    if deleted.rows_affected == 0 {
        txn.rollback().await?;
        return Err(Error::CategoryNotFound {
            slug: category_id.to_string(),
        });
    }

    txn.commit().await?;
    info!(removed_products = removed, "Deleted category");
    Ok(removed)
}

/// Creates every configured category whose slug is not in the database yet.
///
/// Returns how many categories were created.
pub async fn seed_categories(db: &DatabaseConnection, configs: &[CategoryConfig]) -> Result<usize> {
    let mut created = 0;
    for config in configs {
        if get_category_by_slug(db, config.slug.trim()).await?.is_some() {
            continue;
        }
        create_category(db, config.into()).await?;
        created += 1;
    }
    info!("Seeded {created} of {} configured categories", configs.len());
    Ok(created)
}
