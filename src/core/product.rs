//! Product business logic - Handles saving, looking up and removing products.
//!
//! Every write goes through [`save_product`]: whenever the product has an image, new
//! upload or already stored, its extension and then its size are checked before
//! anything touches the disk or the database.
//! Uniqueness of `product_name` and `slug` is left to the table's unique constraints;
//! a clash surfaces as [`Error::UniqueViolation`].

use crate::{
    entities::{Category, Product, category, product},
    errors::{Error, Result},
    forms,
    media::MediaStorage,
    routing::Router,
    validation::{
        ImageUpload, validate_image_byte_count, validate_image_extension, validate_image_name,
        validate_image_size, validate_slug,
    },
};
use sea_orm::{ActiveValue, QueryOrder, Set, prelude::*};
use std::collections::HashMap;
use tracing::{debug, info, instrument};
use validator::Validate;

/// Values submitted for a product create or edit
#[derive(Debug, Clone, Validate)]
pub struct ProductInput {
    /// Display name, 1-200 characters
    #[validate(length(min = 1, max = 200))]
    pub product_name: String,
    /// URL-safe identifier, 1-200 characters
    #[validate(length(min = 1, max = 200), custom(function = "validate_slug"))]
    pub slug: String,
    /// Optional description, up to 500 characters
    #[validate(length(max = 500))]
    pub description: String,
    /// Unit price; sign is not restricted
    pub price: Decimal,
    /// Units on hand
    pub stock: i32,
    /// Whether the product is listed in the storefront
    pub is_available: bool,
    /// ID of the owning category
    pub category_id: i64,
    /// Newly uploaded image, if any
    pub image: Option<ImageUpload>,
}

impl ProductInput {
    /// Builds an input from submitted form data using [`forms::get_form`], so prices
    /// may contain thousands separators.
    ///
    /// # Errors
    /// Returns [`Error::Form`] listing every field that failed to clean.
    pub fn from_form(data: &HashMap<String, String>, image: Option<ImageUpload>) -> Result<Self> {
        let cleaned = forms::get_form().clean(data)?;
        Ok(Self {
            product_name: cleaned.text("product_name"),
            slug: cleaned.text("slug"),
            description: cleaned.text("description"),
            price: cleaned.decimal("price").unwrap_or_default(),
            stock: cleaned
                .integer("stock")
                .and_then(|n| i32::try_from(n).ok())
                .unwrap_or_default(),
            is_available: cleaned.bool("is_available"),
            category_id: cleaned.integer("category").unwrap_or_default(),
            image,
        })
    }

    fn trimmed(self) -> Self {
        Self {
            product_name: self.product_name.trim().to_string(),
            slug: self.slug.trim().to_string(),
            description: self.description.trim().to_string(),
            ..self
        }
    }
}

/// Persists a product: inserts when `model.id` is not set, updates otherwise.
///
/// With an upload, [`validate_image_extension`] and then [`validate_image_size`] run
/// first; a valid upload is stored under `photos/products` and its path recorded in
/// `images`. Without an upload, an image path already in `model.images` gets the same
/// two checks against the stored file. Either check can abort the save, in which case
/// nothing is written. A product with no image skips both. Timestamps are stamped by
/// the entity's save hook.
///
/// # Errors
/// Returns an error if:
/// - The image has a disallowed extension or exceeds 2 MiB
/// - A stored image path points at a file that cannot be read
/// - The image cannot be written to the media root
/// - `product_name` or `slug` is already used by another product
/// - The database operation fails
#[instrument(skip(db, media, model, image), fields(has_image = image.is_some()))]
pub async fn save_product(
    db: &DatabaseConnection,
    media: &MediaStorage,
    mut model: product::ActiveModel,
    image: Option<&ImageUpload>,
) -> Result<product::Model> {
    if let Some(image) = image {
        validate_image_extension(image)?;
        validate_image_size(image)?;
        let path = media.store_product_image(image).await?;
        model.images = Set(Some(path));
    } else if let ActiveValue::Set(Some(path)) | ActiveValue::Unchanged(Some(path)) =
        &model.images
    {
        validate_image_name(path)?;
        validate_image_byte_count(media.stored_size(path).await?)?;
    }

    let product = if model.id.is_not_set() {
        model.insert(db).await?
    } else {
        model.update(db).await?
    };
    debug!(id = product.id, "Saved product");
    Ok(product)
}

/// Creates a new product after checking its fields and that its category exists.
///
/// # Errors
/// Returns an error if:
/// - A field is blank, too long, or the slug is not URL-safe
/// - The category does not exist
/// - Any [`save_product`] check fails
#[instrument(skip(db, media, input), fields(product = %input.product_name))]
pub async fn create_product(
    db: &DatabaseConnection,
    media: &MediaStorage,
    input: ProductInput,
) -> Result<product::Model> {
    let input = input.trimmed();
    input.validate()?;
    ensure_category_exists(db, input.category_id).await?;

    let model = product::ActiveModel {
        product_name: Set(input.product_name),
        slug: Set(input.slug),
        description: Set(input.description),
        price: Set(input.price),
        images: Set(None),
        stock: Set(input.stock),
        is_available: Set(input.is_available),
        category_id: Set(input.category_id),
        ..Default::default()
    };

    let product = save_product(db, media, model, input.image.as_ref()).await?;
    info!(id = product.id, slug = %product.slug, "Created product");
    Ok(product)
}

/// Replaces the editable fields of an existing product.
///
/// The stored image is kept unless `input.image` carries a new upload.
/// `created_date` never changes.
///
/// # Errors
/// Returns an error if:
/// - The product does not exist
/// - A field is blank, too long, or the slug is not URL-safe
/// - The category does not exist
/// - Any [`save_product`] check fails
#[instrument(skip(db, media, input), fields(product = %input.product_name))]
pub async fn update_product(
    db: &DatabaseConnection,
    media: &MediaStorage,
    product_id: i64,
    input: ProductInput,
) -> Result<product::Model> {
    let input = input.trimmed();
    input.validate()?;

    let mut model: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: product_id.to_string(),
        })?
        .into();
    ensure_category_exists(db, input.category_id).await?;

    model.product_name = Set(input.product_name);
    model.slug = Set(input.slug);
    model.description = Set(input.description);
    model.price = Set(input.price);
    model.stock = Set(input.stock);
    model.is_available = Set(input.is_available);
    model.category_id = Set(input.category_id);

    save_product(db, media, model, input.image.as_ref()).await
}

/// Deletes a product and returns the removed row.
///
/// The image file, if any, stays in the media root.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if no product has this ID, or a database error.
#[instrument(skip(db))]
pub async fn delete_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    let product = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            name: product_id.to_string(),
        })?;

    Product::delete_by_id(product_id).exec(db).await?;
    info!(slug = %product.slug, "Deleted product");
    Ok(product)
}

/// Retrieves a product by its ID.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a product by its slug.
pub async fn get_product_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Slug.eq(slug))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves every product of a category, ordered alphabetically by name.
pub async fn get_products_in_category(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::CategoryId.eq(category_id))
        .order_by_asc(product::Column::ProductName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves all products offered in the storefront, ordered alphabetically by name.
pub async fn get_available_products(db: &DatabaseConnection) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::IsAvailable.eq(true))
        .order_by_asc(product::Column::ProductName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Loads the product's category and returns its detail-page path.
///
/// # Errors
/// Returns [`Error::CategoryNotFound`] if the category row is gone, or the routing error
/// from [`product::Model::get_url`].
pub async fn product_url(
    db: &DatabaseConnection,
    router: &Router,
    product: &product::Model,
) -> Result<String> {
    let category = product
        .find_related(Category)
        .one(db)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            slug: product.category_id.to_string(),
        })?;
    product.get_url(&category, router)
}

async fn ensure_category_exists(
    db: &DatabaseConnection,
    category_id: i64,
) -> Result<category::Model> {
    Category::find_by_id(category_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            slug: category_id.to_string(),
        })
}
