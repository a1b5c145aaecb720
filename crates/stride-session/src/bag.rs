//! The shopping bag.
//!
//! Items are copies of catalog products in the order they were added. Adding
//! the same product twice yields two entries; there is no quantity merging.

use serde::Serialize;
use stride_core::types::Product;

use crate::error::SessionError;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Bag {
    items: Vec<Product>,
}

impl Bag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, product: Product) {
        self.items.push(product);
    }

    /// Remove and return the item at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Product, SessionError> {
        if index >= self.items.len() {
            return Err(SessionError::BagIndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of item prices.
    pub fn total(&self) -> f64 {
        self.items.iter().map(|p| p.price).sum()
    }
}
