//! # tally-core: Pure Checkout Logic for Tally
//!
//! This crate is the **heart** of Tally Checkout. It contains the cart,
//! pricing, discount and checkout logic as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 tally-session (Orchestration)                   │   │
//! │  │    config (TOML + env) ──► Session ──► tracing subscriber      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌──────────────┐   │   │
//! │  │   │ catalog  │  │   cart   │  │ pricing  │  │   discount   │   │   │
//! │  │   │ Product  │  │ CartEntry│  │ tax      │  │ DiscountRule │   │   │
//! │  │   │ stock    │  │ add/rm   │  │ shipping │  │ best rule    │   │   │
//! │  │   └──────────┘  └──────────┘  └──────────┘  └──────────────┘   │   │
//! │  │                        │                                        │   │
//! │  │                 ┌──────▼──────┐                                 │   │
//! │  │                 │  checkout   │──► Order + new Catalog          │   │
//! │  │                 └──────┬──────┘                                 │   │
//! │  │                        │ OrderSink (trait)                      │   │
//! │  │   NO I/O • NO GLOBALS • VALUES IN, VALUES OUT                   │   │
//! │  └────────────────────────┼────────────────────────────────────────┘   │
//! │                           ▼                                             │
//! │                caller-provided persistence                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Rate, ShippingTiers, CheckoutConfig)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`catalog`] - Immutable product snapshot with stock
//! - [`cart`] - Cart value type
//! - [`pricing`] - Subtotal, tax, shipping and totals
//! - [`discount`] - Discount rules and best-rule selection
//! - [`checkout`] - Order creation and stock decrement
//! - [`order`] - The completed order record
//! - [`sink`] - Persistence seam for orders
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Same input = same output (order ids and timestamps aside)
//! 2. **No I/O**: Orders leave the crate only through [`OrderSink`]
//! 3. **Integer Money**: All monetary values are in cents (i64)
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::discount::{find_best_discount, DiscountKind, DiscountRule};
//! use tally_core::checkout::checkout;
//! use tally_core::{Cart, Catalog, CheckoutConfig, Money, Product, ProductId, Rate, ShippingTiers};
//!
//! let catalog = Catalog::from_products([
//!     Product::new(1, "Chocolate", Money::from_cents(1500), "Sweets", 10).unwrap(),
//! ])
//! .unwrap();
//! let cart = Cart::new().add_item(&catalog, ProductId(1), 3).unwrap();
//!
//! let rules = [DiscountRule::new("3-for-2", "3 for 2", DiscountKind::buy_x_get_y(2, 1).unwrap()).unwrap()];
//! let discount = find_best_discount(&cart, &rules).map_or(Money::zero(), |d| d.amount);
//!
//! let config = CheckoutConfig::new(
//!     Rate::new(Decimal::new(14, 2)).unwrap(),
//!     ShippingTiers::new(Money::from_cents(1000), Money::from_cents(2000), Money::from_cents(3000)).unwrap(),
//! );
//! let done = checkout(&config, &catalog, &cart, discount).unwrap();
//!
//! // (45.00 − 15.00) + 4.20 tax + 10.00 shipping
//! assert_eq!(done.order.total(), Money::from_cents(4420));
//! assert_eq!(done.catalog.stock_of(ProductId(1)), Some(7));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod discount;
pub mod error;
pub mod money;
pub mod order;
pub mod pricing;
pub mod sink;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tally_core::Money` instead of
// `use tally_core::money::Money`

pub use cart::{Cart, CartEntry};
pub use catalog::Catalog;
pub use checkout::{checkout, checkout_and_save, Checkout, SavedCheckout};
pub use discount::{AppliedDiscount, DiscountKind, DiscountRule};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::Order;
pub use pricing::CartTotals;
pub use sink::{MemoryOrderSink, OrderSink};
pub use types::*;
