//! Category and budget filtering over the catalog.

use std::fmt;

use serde::{Serialize, Serializer};
use stride_core::types::Product;

use crate::catalog::Catalog;

/// Label of the "no category filter" choice.
pub const ALL_CATEGORIES: &str = "All";

/// Category selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every category passes.
    #[default]
    All,
    /// Only products whose category equals this name (exact match).
    Named(String),
}

impl CategoryFilter {
    /// Interpret a selector value. Blank or `"All"` (any case) is the sentinel.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case(ALL_CATEGORIES) {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(value.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => name == category,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Named(name) => name,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Inclusive price interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    pub fn new(min: f64, max: f64) -> Self {
        if min > max {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }
}

/// The visitor's current filter choice, rebuilt on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSelection {
    pub category: CategoryFilter,
    pub price: PriceRange,
}

impl FilterSelection {
    /// Selection that lets every product in `catalog` through.
    pub fn all(catalog: &Catalog) -> Self {
        Self {
            category: CategoryFilter::All,
            price: catalog.slider_bounds(),
        }
    }

    /// Build a selection from optional request values.
    ///
    /// Missing bounds fall back to the catalog's slider bounds; non-finite
    /// bounds are treated as missing.
    pub fn resolve(
        catalog: &Catalog,
        category: Option<&str>,
        min: Option<f64>,
        max: Option<f64>,
    ) -> Self {
        let bounds = catalog.slider_bounds();
        let min = min.filter(|v| v.is_finite()).unwrap_or(bounds.min);
        let max = max.filter(|v| v.is_finite()).unwrap_or(bounds.max);

        Self {
            category: category.map(CategoryFilter::parse).unwrap_or_default(),
            price: PriceRange::new(min, max),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.category.matches(&product.category) && self.price.contains(product.price)
    }
}

/// Products passing `selection`, in catalog order.
pub fn filter_products<'a>(catalog: &'a Catalog, selection: &FilterSelection) -> Vec<&'a Product> {
    catalog
        .products()
        .iter()
        .filter(|p| selection.matches(p))
        .collect()
}
