//! # Checkout Transaction
//!
//! Turns a cart into an [`Order`] and a catalog with stock taken out.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        checkout(config, catalog, cart, discount)        │
//! │                                                                         │
//! │  1. cart empty? ─────────────────────────────────► EmptyCart            │
//! │  2. every line still in catalog with enough stock? ► NotFound /         │
//! │                                                     InsufficientStock   │
//! │  3. catalog' = catalog with stock − qty per line                        │
//! │  4. discount clamped to [0, subtotal]                                   │
//! │  5. tax      = (subtotal − discount) × tax_rate                         │
//! │     shipping = shipping_fee(total quantity)                             │
//! │  6. total    = (subtotal − discount) + tax + shipping                   │
//! │  7. Order { uuid, receipt, lines, amounts, created_at }                 │
//! │                                                                         │
//! │  Any failure in 1-2 returns before anything is produced; the caller's   │
//! │  catalog is never touched.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`checkout_and_save`] additionally hands the order to an [`OrderSink`].
//! A failed save does NOT undo the checkout: the order and updated catalog
//! are still returned, together with the sink's error.

use tracing::{info, warn};

use crate::cart::Cart;
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::order::{Order, OrderAmounts};
use crate::pricing::{cart_subtotal, shipping_fee, tax, total};
use crate::sink::OrderSink;
use crate::types::CheckoutConfig;

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub order: Order,

    /// The catalog with purchased units removed from stock.
    pub catalog: Catalog,
}

/// Result of [`checkout_and_save`].
#[derive(Debug)]
pub struct SavedCheckout<E> {
    pub order: Order,
    pub catalog: Catalog,

    /// Where the sink stored the order, or why it could not.
    pub saved: Result<String, E>,
}

/// Checks out `cart` against `catalog`.
///
/// `discount_amount` is normally the amount of the best applicable rule
/// (see [`find_best_discount`](crate::discount::find_best_discount)). It is
/// clamped to `[0, subtotal]`.
///
/// ## Errors
/// - `EmptyCart` if the cart has no lines
/// - `NotFound` if a line's product is no longer in `catalog`
/// - `InsufficientStock` if `catalog` can no longer cover a line
///
/// ## Example
/// ```rust
/// use tally_core::checkout::checkout;
/// use tally_core::{Cart, Catalog, CheckoutConfig, Money, Product, ProductId, Rate, ShippingTiers};
/// use rust_decimal::Decimal;
///
/// let catalog = Catalog::from_products([
///     Product::new(1, "Chocolate", Money::from_cents(1500), "Sweets", 10).unwrap(),
///     Product::new(2, "Biscuits", Money::from_cents(1000), "Bakery", 20).unwrap(),
/// ])
/// .unwrap();
/// let cart = Cart::new()
///     .add_item(&catalog, ProductId(1), 2).unwrap()
///     .add_item(&catalog, ProductId(2), 3).unwrap();
/// let config = CheckoutConfig::new(
///     Rate::new(Decimal::new(14, 2)).unwrap(),
///     ShippingTiers::new(Money::from_cents(1000), Money::from_cents(2000), Money::from_cents(3000)).unwrap(),
/// );
///
/// let done = checkout(&config, &catalog, &cart, Money::zero()).unwrap();
/// assert_eq!(done.order.total(), Money::from_cents(7840));
/// assert_eq!(done.catalog.stock_of(ProductId(1)), Some(8));
/// assert_eq!(catalog.stock_of(ProductId(1)), Some(10));
/// ```
pub fn checkout(
    config: &CheckoutConfig,
    catalog: &Catalog,
    cart: &Cart,
    discount_amount: Money,
) -> CoreResult<Checkout> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    // Validate all lines before producing anything.
    for entry in cart.items() {
        let product_id = entry.product_id();
        let product = catalog
            .get_product(product_id)
            .ok_or(CoreError::NotFound(product_id))?;

        if !product.can_supply(entry.quantity()) {
            return Err(CoreError::InsufficientStock {
                product_id,
                needed: entry.quantity(),
                available: product.stock,
            });
        }
    }

    let mut updated = catalog.clone();
    for entry in cart.items() {
        let product_id = entry.product_id();
        let Some(stock) = updated.stock_of(product_id) else {
            unreachable!("line {product_id} was validated against the catalog");
        };
        updated = updated.update_stock(product_id, stock - entry.quantity())?;
    }

    let subtotal = cart_subtotal(cart);
    let discount = clamp_discount(discount_amount, subtotal);
    let discounted = subtotal - discount;
    let tax = tax(discounted, config.tax_rate.value())?;
    let total_quantity = cart.total_quantity();
    let shipping = shipping_fee(total_quantity, &config.shipping_tiers);

    let order = Order::new(
        cart.items().cloned().collect(),
        OrderAmounts {
            subtotal,
            discount,
            tax,
            shipping,
            total: total(discounted, tax, shipping),
        },
    );

    info!(
        order_id = %order.order_id(),
        receipt_number = %order.receipt_number(),
        lines = order.items().len(),
        total_quantity,
        total = %order.total(),
        "Checkout completed"
    );

    Ok(Checkout {
        order,
        catalog: updated,
    })
}

/// Runs [`checkout`] and saves the order to `sink` exactly once.
///
/// ## Errors
/// Same as [`checkout`]. The sink is not called when checkout fails. A sink
/// failure is reported in [`SavedCheckout::saved`], not here.
pub fn checkout_and_save<S: OrderSink>(
    config: &CheckoutConfig,
    catalog: &Catalog,
    cart: &Cart,
    discount_amount: Money,
    sink: &mut S,
) -> CoreResult<SavedCheckout<S::Error>> {
    let Checkout { order, catalog } = checkout(config, catalog, cart, discount_amount)?;

    let saved = sink.save(&order);
    match &saved {
        Ok(location) => info!(order_id = %order.order_id(), location = %location, "Order saved"),
        Err(e) => warn!(order_id = %order.order_id(), error = %e, "Failed to save order"),
    }

    Ok(SavedCheckout {
        order,
        catalog,
        saved,
    })
}

fn clamp_discount(requested: Money, subtotal: Money) -> Money {
    let clamped = requested.min(subtotal).max(Money::zero());
    if clamped != requested {
        warn!(requested = %requested, applied = %clamped, "Discount clamped to subtotal");
    }
    clamped
}

// =============================================================================
// Unit Tests
// =============================================================================
