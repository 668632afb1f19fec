//! Unified error types for the store catalog.
//!
//! Every fallible operation in the crate returns [`Result`]. Validation failures
//! are kept apart from storage faults so callers can render them as form errors.

use crate::{forms::FormErrors, validation::ValidationError};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Crate-wide error type
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Any database failure not classified more precisely
    #[error("Database error: {0}")]
    Database(DbErr),

    /// A unique column (e.g. `product_name`, `slug`) already holds this value
    #[error("Uniqueness violation: {message}")]
    UniqueViolation {
        /// Message reported by the storage layer
        message: String,
    },

    /// An uploaded image was rejected
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// One or more entity fields break their length or format rules
    #[error("Invalid field values: {0}")]
    InvalidFields(#[from] validator::ValidationErrors),

    /// Submitted form data could not be cleaned
    #[error("Invalid form data: {0}")]
    Form(FormErrors),

    /// Referenced category does not exist
    #[error("Category not found: {slug}")]
    CategoryNotFound {
        /// Slug or id used for the lookup
        slug: String,
    },

    /// Referenced product does not exist
    #[error("Product not found: {name}")]
    ProductNotFound {
        /// Name, slug or id used for the lookup
        name: String,
    },

    /// No route is registered under this name
    #[error("No route named '{name}'")]
    RouteNotFound {
        /// Requested route name
        name: String,
    },

    /// A route was reversed with the wrong number of arguments
    #[error("Route '{name}' expects {expected} argument(s), got {given}")]
    RouteArguments {
        /// Route name
        name: String,
        /// Placeholders in the route pattern
        expected: usize,
        /// Arguments supplied
        given: usize,
    },

    /// Filesystem failure while storing media
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing or malformed
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl From<DbErr> for Error {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(message)) => Self::UniqueViolation { message },
            _ => Self::Database(err),
        }
    }
}

impl From<FormErrors> for Error {
    fn from(errors: FormErrors) -> Self {
        Self::Form(errors)
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
