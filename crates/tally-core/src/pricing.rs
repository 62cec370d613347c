//! # Price Calculator
//!
//! Stateless price math: line subtotals, cart subtotal, tax, tiered
//! shipping and grand totals.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cart_total (no discount)                                               │
//! │                                                                         │
//! │  cart ──► cart_subtotal ──► tax(subtotal, rate) ──┐                     │
//! │    │                                              ├──► total            │
//! │    └──► total_quantity ──► shipping_fee(tiers) ───┘                     │
//! │                                                                         │
//! │  checkout (with discount) runs the same steps but taxes                 │
//! │  (subtotal − discount). See `checkout::checkout`.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartEntry};
use crate::error::CoreResult;
use crate::money::Money;
use crate::types::{Rate, ShippingTiers};

/// Largest item count charged at `tier1`.
pub const TIER1_MAX_ITEMS: i64 = 5;

/// Largest item count charged at `tier2`.
pub const TIER2_MAX_ITEMS: i64 = 10;

/// Totals for a cart priced without a discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

/// `quantity × unit_price` for one line.
pub fn item_subtotal(entry: &CartEntry) -> Money {
    entry.product().unit_price.multiply_quantity(entry.quantity())
}

/// Sum of all line subtotals. Zero for an empty cart.
pub fn cart_subtotal(cart: &Cart) -> Money {
    cart.items().map(item_subtotal).sum()
}

/// Tax on `amount` at `rate`, rounded to the cent.
///
/// ## Errors
/// `InvalidRate` if `rate` is below 0 or above 1.
///
/// ## Example
/// ```rust
/// use rust_decimal::Decimal;
/// use tally_core::money::Money;
/// use tally_core::pricing::tax;
///
/// let t = tax(Money::from_cents(6000), Decimal::new(14, 2)).unwrap();
/// assert_eq!(t.cents(), 840);
///
/// assert!(tax(Money::from_cents(6000), Decimal::new(2, 0)).is_err());
/// ```
pub fn tax(amount: Money, rate: Decimal) -> CoreResult<Money> {
    let rate = Rate::new(rate)?;
    Ok(amount.apply_rate(rate))
}

/// Flat shipping fee by total item count.
///
/// ## Tiers
/// ```text
/// 0 items ........ 0
/// 1 – 5 items .... tier1
/// 6 – 10 items ... tier2
/// 11+ items ...... tier3
/// ```
/// A non-positive count ships free.
pub fn shipping_fee(item_count: i64, tiers: &ShippingTiers) -> Money {
    match item_count {
        n if n <= 0 => Money::zero(),
        n if n <= TIER1_MAX_ITEMS => tiers.tier1,
        n if n <= TIER2_MAX_ITEMS => tiers.tier2,
        _ => tiers.tier3,
    }
}

/// `subtotal + tax + shipping`.
#[inline]
pub fn total(subtotal: Money, tax: Money, shipping: Money) -> Money {
    subtotal + tax + shipping
}

/// Prices a cart without a discount.
///
/// Tax is computed on the undiscounted subtotal here. Checkout with a
/// discount taxes the discounted subtotal instead; both paths are kept.
///
/// ## Errors
/// `InvalidRate` if `tax_rate` is outside [0, 1].
pub fn cart_total(cart: &Cart, tax_rate: Decimal, tiers: &ShippingTiers) -> CoreResult<CartTotals> {
    let subtotal = cart_subtotal(cart);
    let tax = tax(subtotal, tax_rate)?;
    let total_quantity = cart.total_quantity();
    let shipping = shipping_fee(total_quantity, tiers);

    Ok(CartTotals {
        line_count: cart.line_count(),
        total_quantity,
        subtotal,
        tax,
        shipping,
        total: total(subtotal, tax, shipping),
    })
}
