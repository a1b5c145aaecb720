//! Product catalog for the Stride storefront.
//!
//! Loads the products CSV once at startup, validates the required columns,
//! derives per-product tag lists, and answers the category/price filter
//! queries behind the product grid.

pub mod catalog;
pub mod error;
pub mod filter;
pub mod loader;

pub use catalog::Catalog;
pub use error::CatalogError;
pub use filter::{filter_products, CategoryFilter, FilterSelection, PriceRange};
pub use loader::{load_catalog, parse_catalog, split_tags, REQUIRED_COLUMNS};
