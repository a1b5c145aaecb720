//! The in-memory product table.

use std::collections::BTreeSet;

use stride_core::types::Product;

use crate::filter::PriceRange;

/// Products in source order. Read-only after loading.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id. Ids are not required to be unique; the first
    /// match in source order is returned.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Distinct non-empty categories, sorted ascending.
    pub fn categories(&self) -> Vec<String> {
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| !c.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Lowest and highest price in the catalog, or `None` when empty.
    pub fn price_bounds(&self) -> Option<PriceRange> {
        let mut prices = self.products.iter().map(|p| p.price);
        let first = prices.next()?;
        let (min, max) = prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(PriceRange::new(min, max))
    }

    /// Whole-number budget bounds for the price control.
    ///
    /// Rounded outward so the default selection always covers every product.
    /// An empty catalog yields `0..=0`.
    pub fn slider_bounds(&self) -> PriceRange {
        self.price_bounds()
            .map(|r| PriceRange::new(r.min.floor(), r.max.ceil()))
            .unwrap_or_else(|| PriceRange::new(0.0, 0.0))
    }
}
