//! Named routes and reverse resolution.
//!
//! Only the reverse direction is modelled: the catalog needs canonical paths for
//! products and categories, while request dispatch belongs to the web layer.

use crate::errors::{Error, Result};
use std::collections::HashMap;
use tracing::trace;

/// Route name of the product detail page: `(category_slug, product_slug)`.
pub const PRODUCT_DETAIL: &str = "product_detail";

/// Route name of a category listing page: `(category_slug)`.
pub const PRODUCTS_BY_CATEGORY: &str = "products_by_category";

/// One path segment of a route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed route pattern such as `/store/{category_slug}/{product_slug}/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    segments: Vec<Segment>,
    trailing_slash: bool,
}

impl RoutePattern {
    /// Parses a pattern; `{name}` segments become positional placeholders.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => Segment::Placeholder(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self {
            segments,
            trailing_slash: pattern.len() > 1 && pattern.ends_with('/'),
        }
    }

    /// Number of positional arguments the pattern expects.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Placeholder(_)))
            .count()
    }

    fn render(&self, args: &[&str]) -> String {
        let mut args = args.iter();
        let mut path = String::new();
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Literal(text) => path.push_str(text),
                Segment::Placeholder(_) => path.push_str(args.next().copied().unwrap_or_default()),
            }
        }
        if path.is_empty() || self.trailing_slash {
            path.push('/');
        }
        path
    }
}

/// Table of named routes
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: HashMap<String, RoutePattern>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Router with the storefront routes registered.
    #[must_use]
    pub fn store() -> Self {
        Self::new()
            .route(PRODUCTS_BY_CATEGORY, "/store/category/{category_slug}/")
            .route(PRODUCT_DETAIL, "/store/{category_slug}/{product_slug}/")
    }

    /// Registers (or replaces) a named route.
    #[must_use]
    pub fn route(mut self, name: &str, pattern: &str) -> Self {
        self.routes
            .insert(name.to_string(), RoutePattern::parse(pattern));
        self
    }

    /// Builds the path for `name`, filling placeholders with `args` in order.
    ///
    /// # Errors
    /// Returns [`Error::RouteNotFound`] for an unregistered name and
    /// [`Error::RouteArguments`] when `args` does not match the pattern's arity.
    pub fn reverse(&self, name: &str, args: &[&str]) -> Result<String> {
        let pattern = self.routes.get(name).ok_or_else(|| Error::RouteNotFound {
            name: name.to_string(),
        })?;

        if pattern.arity() != args.len() {
            return Err(Error::RouteArguments {
                name: name.to_string(),
                expected: pattern.arity(),
                given: args.len(),
            });
        }

        let path = pattern.render(args);
        trace!(route = name, %path, "reversed route");
        Ok(path)
    }
}
