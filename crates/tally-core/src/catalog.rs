//! # Catalog
//!
//! An immutable snapshot of products keyed by id.
//!
//! The core never owns the catalog's storage: callers load it, pass it in by
//! reference, and receive updated copies back. Nothing here mutates a
//! catalog the caller still holds.
//!
//! ```text
//! caller's snapshot ──► update_stock(1, 8) ──► NEW snapshot
//!        │                                         │
//!        ▼                                         ▼
//!   stock[1] = 10 (unchanged)                 stock[1] = 8
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{Product, ProductId};
use crate::validation::ValidationResult;

/// Products by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: BTreeMap<ProductId, Product>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Builds a catalog, rejecting duplicate product ids.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::{Catalog, Money, Product, ProductId};
    ///
    /// let catalog = Catalog::from_products([
    ///     Product::new(1, "Chocolate", Money::from_cents(1500), "Sweets", 10).unwrap(),
    ///     Product::new(2, "Biscuits", Money::from_cents(1000), "Bakery", 20).unwrap(),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(catalog.len(), 2);
    /// assert_eq!(catalog.get_product(ProductId(2)).map(|p| p.stock), Some(20));
    /// ```
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> ValidationResult<Self> {
        let mut map = BTreeMap::new();

        for product in products {
            let id = product.id;
            if map.insert(id, product).is_some() {
                return Err(ValidationError::Duplicate {
                    field: "product id".to_string(),
                    value: id.to_string(),
                });
            }
        }

        Ok(Catalog { products: map })
    }

    /// Returns a copy of this catalog with `product` inserted or replaced.
    pub fn with_product(&self, product: Product) -> Self {
        let mut products = self.products.clone();
        products.insert(product.id, product);
        Catalog { products }
    }

    /// Looks up a product by id.
    pub fn get_product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(&id)
    }

    /// Returns a new catalog in which product `id` has `new_stock` units.
    ///
    /// The product is replaced wholesale; `self` is left untouched.
    ///
    /// ## Errors
    /// - `NotFound` if `id` is not in the catalog
    /// - `Validation` if `new_stock` is negative
    pub fn update_stock(&self, id: ProductId, new_stock: i64) -> CoreResult<Self> {
        let product = self.get_product(id).ok_or(CoreError::NotFound(id))?;
        let replacement = product.with_stock(new_stock)?;

        debug!(product_id = %id, old_stock = product.stock, new_stock, "Stock updated");

        Ok(self.with_product(replacement))
    }

    /// Returns the stock of product `id`, if present.
    pub fn stock_of(&self, id: ProductId) -> Option<i64> {
        self.get_product(id).map(|p| p.stock)
    }

    /// Checks if product `id` is in the catalog.
    pub fn contains(&self, id: ProductId) -> bool {
        self.products.contains_key(&id)
    }

    /// Iterates over products in id order.
    pub fn products(&self) -> impl Iterator<Item = &Product> + '_ {
        self.products.values()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Checks if the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn test_catalog() -> Catalog {
        Catalog::from_products([
            Product::new(1, "Chocolate", Money::from_cents(1500), "Sweets", 10).unwrap(),
            Product::new(2, "Biscuits", Money::from_cents(1000), "Bakery", 20).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_products_rejects_duplicates() {
        let result = Catalog::from_products([
            Product::new(1, "Chocolate", Money::from_cents(1500), "Sweets", 10).unwrap(),
            Product::new(1, "Dark Chocolate", Money::from_cents(1800), "Sweets", 5).unwrap(),
        ]);

        assert_eq!(
            result,
            Err(ValidationError::Duplicate {
                field: "product id".to_string(),
                value: "1".to_string(),
            })
        );
    }

    #[test]
    fn test_update_stock_returns_new_catalog() {
        let catalog = test_catalog();
        let updated = catalog.update_stock(ProductId(1), 8).unwrap();

        assert_eq!(catalog.stock_of(ProductId(1)), Some(10));
        assert_eq!(updated.stock_of(ProductId(1)), Some(8));
        assert_eq!(updated.stock_of(ProductId(2)), Some(20));
    }

    #[test]
    fn test_update_stock_unknown_product() {
        let catalog = test_catalog();
        assert_eq!(
            catalog.update_stock(ProductId(99), 1),
            Err(CoreError::NotFound(ProductId(99)))
        );
    }

    #[test]
    fn test_update_stock_rejects_negative() {
        let catalog = test_catalog();
        assert!(matches!(
            catalog.update_stock(ProductId(1), -1),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn test_products_iterate_in_id_order() {
        let catalog = test_catalog().with_product(
            Product::new(0, "Apples", Money::from_cents(300), "Produce", 50).unwrap(),
        );
        let ids: Vec<u32> = catalog.products().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(catalog.contains(ProductId(0)));
        assert!(!catalog.is_empty());
    }
}
