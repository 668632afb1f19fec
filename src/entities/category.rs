//! Category entity - Groups products in the catalog.
//!
//! Categories are referenced by products through `category_id`. Deleting a category
//! removes every product that belongs to it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Shirts"), unique, at most 50 characters
    #[sea_orm(unique)]
    pub category_name: String,
    /// URL-safe identifier used in store paths, unique, at most 100 characters
    #[sea_orm(unique)]
    pub slug: String,
    /// Optional blurb, at most 255 characters; blank when unset
    #[sea_orm(column_type = "Text")]
    pub description: String,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category has many products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.category_name)
    }
}
