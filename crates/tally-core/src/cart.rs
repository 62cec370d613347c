//! # Cart
//!
//! The shopping cart as a value type.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operation                     Checks                    Result         │
//! │  ─────────                     ──────                    ──────         │
//! │                                                                         │
//! │  add_item(catalog, id, qty) ─► NotFound, InvalidQuantity, ─► new Cart   │
//! │                                InsufficientStock                        │
//! │                                                                         │
//! │  remove_item(id, qty) ───────► InvalidQuantity, NotInCart ─► new Cart   │
//! │                                                                         │
//! │  remove_item_completely(id) ─► (none, no-op if absent) ───► new Cart   │
//! │                                                                         │
//! │  clear() ────────────────────► (none) ────────────────────► empty Cart │
//! │                                                                         │
//! │  NOTE: every operation takes `&self` and returns a NEW cart.            │
//! │        The caller decides whether to keep it.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::types::{Product, ProductId};

/// A line in the cart.
///
/// ## Design Notes
/// - `product`: snapshot of the catalog product taken when the line was
///   last added to, so the cart prices consistently even if the catalog
///   moves on
/// - `quantity`: always ≥ 1; a line that would drop to zero is removed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartEntry {
    product: Product,
    quantity: i64,
}

impl CartEntry {
    fn new(product: Product, quantity: i64) -> Self {
        CartEntry { product, quantity }
    }

    /// The product snapshot for this line.
    #[inline]
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// The product id for this line.
    #[inline]
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Units on this line (≥ 1).
    #[inline]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Entries are unique by product id (adding the same product accumulates)
/// - Every entry has quantity ≥ 1
/// - On creation, each entry's quantity was ≤ the product's catalog stock
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    entries: BTreeMap<ProductId, CartEntry>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Adds `quantity` units of a catalog product.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity accumulates (no duplicate lines)
    /// - The accumulated quantity must not exceed the product's stock
    /// - The line's product snapshot is refreshed from `catalog`
    ///
    /// ## Errors
    /// - `NotFound` if `product_id` is not in `catalog`
    /// - `InvalidQuantity` if `quantity < 1`
    /// - `InsufficientStock { needed, available }` where `needed` is the
    ///   accumulated cart quantity
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::{Cart, Catalog, CoreError, Money, Product, ProductId};
    ///
    /// let catalog = Catalog::from_products([
    ///     Product::new(1, "Chocolate", Money::from_cents(1500), "Sweets", 10).unwrap(),
    /// ])
    /// .unwrap();
    ///
    /// let cart = Cart::new().add_item(&catalog, ProductId(1), 2).unwrap();
    /// assert_eq!(cart.total_quantity(), 2);
    ///
    /// let err = cart.add_item(&catalog, ProductId(1), 9).unwrap_err();
    /// assert_eq!(
    ///     err,
    ///     CoreError::InsufficientStock { product_id: ProductId(1), needed: 11, available: 10 }
    /// );
    /// ```
    pub fn add_item(
        &self,
        catalog: &Catalog,
        product_id: ProductId,
        quantity: i64,
    ) -> CoreResult<Cart> {
        let product = catalog
            .get_product(product_id)
            .ok_or(CoreError::NotFound(product_id))?;

        if quantity < 1 {
            return Err(CoreError::InvalidQuantity { quantity });
        }

        let in_cart = self.quantity_of(product_id);
        let needed = match in_cart.checked_add(quantity) {
            Some(needed) if product.can_supply(needed) => needed,
            // an overflowing total can never be supplied; report the request
            sum => {
                return Err(CoreError::InsufficientStock {
                    product_id,
                    needed: sum.unwrap_or(quantity),
                    available: product.stock,
                });
            }
        };

        debug!(product_id = %product_id, quantity, line_quantity = needed, "Cart item added");

        let mut entries = self.entries.clone();
        entries.insert(product_id, CartEntry::new(product.clone(), needed));
        Ok(Cart { entries })
    }

    /// Removes `quantity` units of a product.
    ///
    /// ## Behavior
    /// - Line drops to zero or below: the line is deleted (removing more
    ///   than present is NOT an error)
    /// - Otherwise the line's quantity decreases by `quantity`
    ///
    /// ## Errors
    /// - `InvalidQuantity` if `quantity < 1`
    /// - `NotInCart` if the product has no line
    pub fn remove_item(&self, product_id: ProductId, quantity: i64) -> CoreResult<Cart> {
        if quantity < 1 {
            return Err(CoreError::InvalidQuantity { quantity });
        }

        let entry = self
            .entries
            .get(&product_id)
            .ok_or(CoreError::NotInCart(product_id))?;

        let mut entries = self.entries.clone();
        let remaining = entry.quantity - quantity;

        if remaining <= 0 {
            entries.remove(&product_id);
        } else {
            entries.insert(product_id, CartEntry::new(entry.product.clone(), remaining));
        }

        debug!(product_id = %product_id, quantity, remaining = remaining.max(0), "Cart item removed");

        Ok(Cart { entries })
    }

    /// Deletes the line for `product_id`. No-op if absent.
    pub fn remove_item_completely(&self, product_id: ProductId) -> Cart {
        let mut entries = self.entries.clone();
        entries.remove(&product_id);
        Cart { entries }
    }

    /// Returns an empty cart.
    pub fn clear(&self) -> Cart {
        Cart::new()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over lines, ordered by product id.
    pub fn items(&self) -> impl Iterator<Item = &CartEntry> + '_ {
        self.entries.values()
    }

    /// Returns the line for `product_id`, if any.
    pub fn get(&self, product_id: ProductId) -> Option<&CartEntry> {
        self.entries.get(&product_id)
    }

    /// Quantity of `product_id` in the cart (0 if absent).
    pub fn quantity_of(&self, product_id: ProductId) -> i64 {
        self.entries.get(&product_id).map_or(0, CartEntry::quantity)
    }

    /// Returns the number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the total quantity of all lines.
    pub fn total_quantity(&self) -> i64 {
        self.entries.values().map(CartEntry::quantity).sum()
    }
}
