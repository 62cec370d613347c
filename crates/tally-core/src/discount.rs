//! # Discount Engine
//!
//! Rule-based discounts evaluated against a cart.
//!
//! ## Eligibility
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A rule applies to a cart entry iff ALL present filters pass:           │
//! │                                                                         │
//! │   rule.active ─────────────────────────── must be true                  │
//! │   minimum_purchase ────────────────────── cart subtotal ≥ minimum       │
//! │   minimum_quantity ────────────────────── entry quantity ≥ minimum      │
//! │   applicable_categories ───────────────── product category ∈ set        │
//! │   applicable_product_ids ──────────────── product id ∈ set              │
//! │                                                                         │
//! │  Absent (None) filters always pass.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Amount per eligible entry
//! ```text
//! Percentage(p) ......... line subtotal × p
//! FixedAmount(a) ........ min(a, line subtotal)        ← per entry, NOT per cart
//! BuyXGetY(x, y) ........ min(⌊qty / x⌋ × y × unit price, line subtotal)
//! ```
//!
//! A rule's cart-level discount is the sum over eligible entries. A
//! `FixedAmount` rule therefore grants its amount once for every
//! qualifying line, which can exceed the nominal amount for the cart.
//!
//! ## Example
//! ```rust
//! use rust_decimal::Decimal;
//! use tally_core::discount::{find_best_discount, DiscountKind, DiscountRule};
//! use tally_core::{Cart, Catalog, Money, Product, ProductId};
//!
//! let catalog = Catalog::from_products([
//!     Product::new(1, "Chocolate", Money::from_cents(1500), "Sweets", 10).unwrap(),
//! ])
//! .unwrap();
//! let cart = Cart::new().add_item(&catalog, ProductId(1), 3).unwrap();
//!
//! let rules = vec![
//!     DiscountRule::new("ten-off", "10% off", DiscountKind::percentage(Decimal::new(10, 2)).unwrap()).unwrap(),
//!     DiscountRule::new("3-for-2", "3 for 2", DiscountKind::buy_x_get_y(2, 1).unwrap()).unwrap(),
//! ];
//!
//! let best = find_best_discount(&cart, &rules).unwrap();
//! assert_eq!(best.rule.id, "3-for-2");
//! assert_eq!(best.amount, Money::from_cents(1500));
//! ```

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cart::{Cart, CartEntry};
use crate::error::CoreResult;
use crate::money::Money;
use crate::pricing::{cart_subtotal, item_subtotal};
use crate::types::{ProductId, Rate};
use crate::validation::{
    validate_minimum_quantity, validate_non_negative_amount, validate_positive_count,
    validate_rule_label, ValidationResult,
};

// =============================================================================
// Discount Kind
// =============================================================================

/// How an eligible entry's discount is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscountKind {
    /// A fraction of the line subtotal.
    Percentage { rate: Rate },

    /// A fixed amount off each eligible line, capped at the line subtotal.
    FixedAmount { amount: Money },

    /// For every `buy` units on a line, `free` units are free.
    BuyXGetY { buy: u32, free: u32 },
}

impl DiscountKind {
    /// Percentage discount; `rate` must be in [0, 1].
    pub fn percentage(rate: Decimal) -> CoreResult<Self> {
        Ok(DiscountKind::Percentage {
            rate: Rate::new(rate)?,
        })
    }

    /// Fixed amount per eligible line; `amount` must be ≥ 0.
    pub fn fixed_amount(amount: Money) -> CoreResult<Self> {
        validate_non_negative_amount("fixed amount", amount)?;
        Ok(DiscountKind::FixedAmount { amount })
    }

    /// Buy `buy`, get `free` free; both must be ≥ 1.
    pub fn buy_x_get_y(buy: u32, free: u32) -> CoreResult<Self> {
        validate_positive_count("buy", buy)?;
        validate_positive_count("free", free)?;
        Ok(DiscountKind::BuyXGetY { buy, free })
    }

    /// Re-checks parameters, for kinds that arrived through deserialization.
    pub fn validate(&self) -> ValidationResult<()> {
        match *self {
            // Rate enforces its own bounds on construction and deserialization.
            DiscountKind::Percentage { .. } => Ok(()),
            DiscountKind::FixedAmount { amount } => {
                validate_non_negative_amount("fixed amount", amount)
            }
            DiscountKind::BuyXGetY { buy, free } => {
                validate_positive_count("buy", buy)?;
                validate_positive_count("free", free)
            }
        }
    }
}

// =============================================================================
// Discount Rule
// =============================================================================

/// A named, conditionally-eligible discount policy.
///
/// Built with [`DiscountRule::new`] and narrowed with the `with_*` methods:
///
/// ```rust
/// use tally_core::discount::{DiscountKind, DiscountRule};
/// use tally_core::Money;
///
/// let rule = DiscountRule::new("sweets-5", "$5 off sweets", DiscountKind::fixed_amount(Money::from_cents(500)).unwrap())
///     .unwrap()
///     .with_categories(["Sweets"])
///     .with_minimum_purchase(Money::from_cents(2000));
///
/// assert!(rule.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRule {
    pub id: String,
    pub name: String,
    pub kind: DiscountKind,

    /// Cart subtotal must reach this amount.
    #[serde(default)]
    pub minimum_purchase: Option<Money>,

    /// Entry quantity must reach this count.
    #[serde(default)]
    pub minimum_quantity: Option<i64>,

    /// Entry category must be one of these.
    #[serde(default)]
    pub applicable_categories: Option<BTreeSet<String>>,

    /// Entry product id must be one of these.
    #[serde(default)]
    pub applicable_product_ids: Option<BTreeSet<ProductId>>,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl DiscountRule {
    /// Creates an active rule with no filters.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: DiscountKind) -> CoreResult<Self> {
        let id = id.into();
        let name = name.into();

        validate_rule_label("rule id", &id)?;
        validate_rule_label("rule name", &name)?;

        Ok(DiscountRule {
            id,
            name,
            kind,
            minimum_purchase: None,
            minimum_quantity: None,
            applicable_categories: None,
            applicable_product_ids: None,
            active: true,
        })
    }

    /// Requires the cart subtotal to reach `minimum`.
    pub fn with_minimum_purchase(mut self, minimum: Money) -> Self {
        self.minimum_purchase = Some(minimum);
        self
    }

    /// Requires each discounted line to hold at least `minimum` units.
    pub fn with_minimum_quantity(mut self, minimum: i64) -> Self {
        self.minimum_quantity = Some(minimum);
        self
    }

    /// Restricts the rule to these categories.
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applicable_categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    /// Restricts the rule to these products.
    pub fn with_product_ids<I, P>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ProductId>,
    {
        self.applicable_product_ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Sets whether the rule is active.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Validates labels, kind parameters and thresholds.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_rule_label("rule id", &self.id)?;
        validate_rule_label("rule name", &self.name)?;
        self.kind.validate()?;

        if let Some(minimum) = self.minimum_purchase {
            validate_non_negative_amount("minimum purchase", minimum)?;
        }
        if let Some(minimum) = self.minimum_quantity {
            validate_minimum_quantity(minimum)?;
        }

        Ok(())
    }
}

/// A rule together with the discount it yields for a particular cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedDiscount<'a> {
    pub rule: &'a DiscountRule,
    pub amount: Money,
}

// =============================================================================
// Evaluation
// =============================================================================

/// Checks whether `rule` applies to `entry` in a cart whose subtotal is
/// `cart_subtotal`.
pub fn is_eligible(rule: &DiscountRule, entry: &CartEntry, cart_subtotal: Money) -> bool {
    if !rule.active {
        return false;
    }

    let product = entry.product();

    rule.minimum_purchase.map_or(true, |min| cart_subtotal >= min)
        && rule
            .minimum_quantity
            .map_or(true, |min| entry.quantity() >= min)
        && rule
            .applicable_categories
            .as_ref()
            .map_or(true, |categories| categories.contains(&product.category))
        && rule
            .applicable_product_ids
            .as_ref()
            .map_or(true, |ids| ids.contains(&product.id))
}

/// Discount `kind` grants on one line, ignoring eligibility.
///
/// Never negative and never more than the line subtotal.
pub fn entry_discount(kind: &DiscountKind, entry: &CartEntry) -> Money {
    let line = item_subtotal(entry);

    let raw = match *kind {
        DiscountKind::Percentage { rate } => line.apply_rate(rate),
        DiscountKind::FixedAmount { amount } => amount,
        DiscountKind::BuyXGetY { buy, free } => {
            let sets = entry.quantity().checked_div(i64::from(buy)).unwrap_or(0);
            // never more free units than the line holds
            let free_units = sets
                .saturating_mul(i64::from(free))
                .min(entry.quantity());
            entry.product().unit_price.multiply_quantity(free_units)
        }
    };

    raw.min(line).max(Money::zero())
}

/// Total discount `rule` grants on `cart`: the sum over eligible entries.
pub fn rule_discount(cart: &Cart, rule: &DiscountRule) -> Money {
    if !rule.active {
        return Money::zero();
    }

    let subtotal = cart_subtotal(cart);

    cart.items()
        .filter(|entry| is_eligible(rule, entry, subtotal))
        .map(|entry| entry_discount(&rule.kind, entry))
        .sum()
}

/// All rules yielding a positive discount, largest first.
///
/// Rules with equal amounts keep their order from `rules`.
pub fn applicable_discounts<'a>(cart: &Cart, rules: &'a [DiscountRule]) -> Vec<AppliedDiscount<'a>> {
    let mut applied: Vec<AppliedDiscount<'a>> = rules
        .iter()
        .map(|rule| AppliedDiscount {
            rule,
            amount: rule_discount(cart, rule),
        })
        .filter(|applied| applied.amount.is_positive())
        .collect();

    // stable: ties stay in supplied order
    applied.sort_by(|a, b| b.amount.cmp(&a.amount));

    debug!(
        rules = rules.len(),
        applicable = applied.len(),
        "Discount rules evaluated"
    );

    applied
}

/// The rule yielding the largest positive discount.
///
/// Ties go to the rule that appears first in `rules`. `None` when no rule
/// yields anything.
pub fn find_best_discount<'a>(cart: &Cart, rules: &'a [DiscountRule]) -> Option<AppliedDiscount<'a>> {
    let best = rules
        .iter()
        .map(|rule| AppliedDiscount {
            rule,
            amount: rule_discount(cart, rule),
        })
        .filter(|applied| applied.amount.is_positive())
        .fold(None, |best: Option<AppliedDiscount<'a>>, candidate| match best {
            Some(current) if current.amount >= candidate.amount => Some(current),
            _ => Some(candidate),
        });

    if let Some(applied) = &best {
        debug!(rule_id = %applied.rule.id, amount = %applied.amount, "Best discount selected");
    }

    best
}

// =============================================================================
// Unit Tests
// =============================================================================
