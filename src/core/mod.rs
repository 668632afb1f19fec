//! Core business logic - framework-agnostic category and product operations.

/// Category creation, lookup, seeding and cascading deletion
pub mod category;
/// Product save pipeline, lookups and URLs
pub mod product;
