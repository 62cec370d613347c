//! # Checkout Session
//!
//! One shopper's cart against one catalog snapshot.
//!
//! ## Session Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Operations                                   │
//! │                                                                         │
//! │  Action                Core call                    Session change      │
//! │  ──────                ─────────                    ──────────────      │
//! │                                                                         │
//! │  add_item ───────────► Cart::add_item ────────────► cart replaced       │
//! │  remove_item ────────► Cart::remove_item ─────────► cart replaced       │
//! │  remove_completely ──► Cart::remove_item_completely► cart replaced      │
//! │  clear_cart ─────────► Cart::clear ───────────────► cart replaced       │
//! │                                                                         │
//! │  totals ─────────────► pricing::cart_total ───────► (read only)         │
//! │  best_discount ──────► discount::find_best ───────► (read only)         │
//! │                                                                         │
//! │  checkout ───────────► find_best_discount                               │
//! │                        checkout_and_save ─────────► catalog replaced,   │
//! │                                                     cart emptied        │
//! │                                                                         │
//! │  NOTE: on any error the session keeps its previous cart and catalog.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The session owns its state; there is no shared or global cart. Callers
//! running several sessions over one catalog must serialize checkouts and
//! hand the updated catalog to the other sessions themselves.

use serde::Serialize;
use tally_core::discount::{applicable_discounts, find_best_discount};
use tally_core::pricing::cart_total;
use tally_core::{
    checkout_and_save, AppliedDiscount, Cart, CartTotals, Catalog, CheckoutConfig, Money, Order,
    OrderSink, ProductId,
};
use tracing::{info, warn};

use crate::config::SessionConfig;
use crate::error::SessionResult;

/// Outcome of [`Session::checkout`].
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSummary {
    pub order: Order,

    /// Id of the discount rule that was applied, if any.
    pub discount_rule: Option<String>,

    /// Where the order was saved.
    pub saved_to: Option<String>,

    /// Why saving failed. The checkout itself still stands.
    pub save_warning: Option<String>,
}

/// A checkout session.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    checkout_config: CheckoutConfig,
    catalog: Catalog,
    cart: Cart,
}

impl Session {
    /// Starts a session with an empty cart.
    ///
    /// ## Errors
    /// `InvalidConfig` or `Core` if `config` fails validation.
    pub fn new(config: SessionConfig, catalog: Catalog) -> SessionResult<Self> {
        config.validate()?;

        info!(
            products = catalog.len(),
            rules = config.discounts.len(),
            tax_rate = %config.checkout.tax_rate,
            "Session started"
        );

        Ok(Session {
            checkout_config: config.checkout_config(),
            config,
            catalog,
            cart: Cart::new(),
        })
    }

    // =========================================================================
    // Cart Operations
    // =========================================================================

    /// Adds `quantity` units of a product to the cart.
    pub fn add_item(&mut self, product_id: ProductId, quantity: i64) -> SessionResult<&Cart> {
        self.cart = self.cart.add_item(&self.catalog, product_id, quantity)?;
        Ok(&self.cart)
    }

    /// Removes `quantity` units of a product from the cart.
    pub fn remove_item(&mut self, product_id: ProductId, quantity: i64) -> SessionResult<&Cart> {
        self.cart = self.cart.remove_item(product_id, quantity)?;
        Ok(&self.cart)
    }

    /// Drops a product's line from the cart. No-op if absent.
    pub fn remove_item_completely(&mut self, product_id: ProductId) -> &Cart {
        self.cart = self.cart.remove_item_completely(product_id);
        &self.cart
    }

    /// Empties the cart.
    pub fn clear_cart(&mut self) -> &Cart {
        self.cart = self.cart.clear();
        &self.cart
    }

    // =========================================================================
    // Read-only Views
    // =========================================================================

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Prices the cart without a discount.
    pub fn totals(&self) -> SessionResult<CartTotals> {
        let totals = cart_total(
            &self.cart,
            self.checkout_config.tax_rate.value(),
            &self.checkout_config.shipping_tiers,
        )?;
        Ok(totals)
    }

    /// Configured rules that reduce this cart, largest first.
    pub fn applicable_discounts(&self) -> Vec<AppliedDiscount<'_>> {
        applicable_discounts(&self.cart, &self.config.discounts)
    }

    /// The configured rule with the largest discount for this cart.
    pub fn best_discount(&self) -> Option<AppliedDiscount<'_>> {
        find_best_discount(&self.cart, &self.config.discounts)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Checks out the cart with the best configured discount.
    ///
    /// On success the session's catalog is replaced by the decremented one
    /// and the cart is emptied, whether or not `sink` managed to save the
    /// order.
    ///
    /// ## Errors
    /// `Core` if checkout fails (`EmptyCart`, `NotFound`,
    /// `InsufficientStock`). The session is left unchanged.
    pub fn checkout<S: OrderSink>(&mut self, sink: &mut S) -> SessionResult<CheckoutSummary> {
        let (discount_rule, discount) = match self.best_discount() {
            Some(applied) => (Some(applied.rule.id.clone()), applied.amount),
            None => (None, Money::zero()),
        };

        let saved = checkout_and_save(
            &self.checkout_config,
            &self.catalog,
            &self.cart,
            discount,
            sink,
        )?;

        self.catalog = saved.catalog;
        self.cart = Cart::new();

        let (saved_to, save_warning) = match saved.saved {
            Ok(location) => (Some(location), None),
            Err(e) => {
                warn!(receipt_number = %saved.order.receipt_number(), "Checkout kept without a saved order");
                (None, Some(e.to_string()))
            }
        };

        Ok(CheckoutSummary {
            order: saved.order,
            discount_rule,
            saved_to,
            save_warning,
        })
    }
}
