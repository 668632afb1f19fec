//! Product entity - Represents a sellable item in the store catalog.
//!
//! Each product belongs to exactly one category and is removed together with it.
//! `product_name` and `slug` are unique across all products. Timestamps are stamped
//! by the save hook below: `created_date` once at insert, `modified_date` on every save.

use crate::routing::{PRODUCT_DETAIL, Router};
use sea_orm::{
    ActiveValue::{NotSet, Set},
    entity::prelude::*,
};
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Blue Denim Shirt"), unique, at most 200 characters
    #[sea_orm(unique)]
    pub product_name: String,
    /// URL-safe identifier used in the detail path, unique, at most 200 characters
    #[sea_orm(unique)]
    pub slug: String,
    /// Free text, at most 500 characters; blank when unset
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Unit price, 10 digits with 2 decimal places
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    /// Stored image path relative to the media root (under `photos/products`)
    pub images: Option<String>,
    /// Units on hand
    pub stock: i32,
    /// Whether the product is offered in the storefront
    pub is_available: bool,
    /// ID of the owning category
    pub category_id: i64,
    /// When the product was first inserted
    pub created_date: DateTimeUtc,
    /// When the product was last saved
    pub modified_date: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one category; deleting the category deletes the product
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now();
        if insert {
            self.created_date = Set(now);
            if self.is_available.is_not_set() {
                self.is_available = Set(true);
            }
        } else if self.created_date.is_set() {
            // created_date is write-once
            self.created_date = NotSet;
        }
        self.modified_date = Set(now);
        Ok(self)
    }
}

impl Model {
    /// Canonical detail-page path, reversed from the `product_detail` route with
    /// `[category.slug, self.slug]`.
    ///
    /// `category` must be the product's own category.
    ///
    /// # Errors
    /// Fails when `router` has no `product_detail` route.
    pub fn get_url(
        &self,
        category: &super::category::Model,
        router: &Router,
    ) -> crate::errors::Result<String> {
        router.reverse(PRODUCT_DETAIL, &[&category.slug, &self.slug])
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.product_name)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;
    use rust_decimal_macros::dec;

    fn cola() -> (Model, super::super::category::Model) {
        let category = super::super::category::Model {
            id: 1,
            category_name: "Drinks".to_string(),
            slug: "drinks".to_string(),
            description: String::new(),
        };
        let now = chrono::Utc::now();
        let product = Model {
            id: 7,
            product_name: "Cola".to_string(),
            slug: "cola".to_string(),
            description: String::new(),
            price: dec!(1.99),
            images: None,
            stock: 10,
            is_available: true,
            category_id: category.id,
            created_date: now,
            modified_date: now,
        };
        (product, category)
    }

    #[test]
    fn test_get_url_uses_product_detail_route() {
        let (product, category) = cola();
        let router = Router::store();
        assert_eq!(
            product.get_url(&category, &router).unwrap(),
            router.reverse(PRODUCT_DETAIL, &["drinks", "cola"]).unwrap()
        );
    }

    #[test]
    fn test_get_url_without_route_fails() {
        let (product, category) = cola();
        let result = product.get_url(&category, &Router::new());
        assert!(matches!(result, Err(Error::RouteNotFound { .. })));
    }

    #[test]
    fn test_display_is_product_name() {
        let (product, category) = cola();
        assert_eq!(product.to_string(), "Cola");
        assert_eq!(category.to_string(), "Drinks");
    }
}
