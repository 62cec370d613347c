//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │ CheckoutConfig  │   │  ShippingTiers  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (integer)   │   │  tax_rate       │   │  tier1  1-5     │       │
//! │  │  name           │   │  shipping_tiers │   │  tier2  6-10    │       │
//! │  │  unit_price     │   └─────────────────┘   │  tier3  11+     │       │
//! │  │  category       │                         └─────────────────┘       │
//! │  │  stock          │   ┌─────────────────┐                             │
//! │  └─────────────────┘   │      Rate       │                             │
//! │                        │  Decimal [0, 1] │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Copy-on-Write Products
//! A `Product` is never edited in place once it sits in a catalog. Stock
//! changes produce a replacement value (`Product::with_stock`) and a new
//! catalog snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{
    validate_category, validate_non_negative_amount, validate_product_name, validate_stock,
    ValidationResult,
};

// =============================================================================
// Product Id
// =============================================================================

/// Integer identifier of a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u32);

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        ProductId(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Rate
// =============================================================================

/// A fraction in the closed interval [0, 1].
///
/// Used for tax rates and percentage discounts. 0.14 = 14%.
///
/// ## Why Decimal?
/// `0.14` is not representable as a binary float. Keeping the rate as a
/// `Decimal` means `$60.00 × 0.14` is exactly `$8.40` before rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Rate(Decimal);

impl Rate {
    /// Creates a rate, rejecting anything below 0 or above 1.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::types::Rate;
    ///
    /// assert!(Rate::new(Decimal::new(14, 2)).is_ok());   // 0.14
    /// assert!(Rate::new(Decimal::new(-1, 2)).is_err());  // -0.01
    /// assert!(Rate::new(Decimal::new(101, 2)).is_err()); // 1.01
    /// ```
    pub fn new(value: Decimal) -> CoreResult<Self> {
        if value < Decimal::ZERO || value > Decimal::ONE {
            return Err(CoreError::InvalidRate { rate: value });
        }
        Ok(Rate(value))
    }

    /// Creates a rate from basis points (825 = 8.25%).
    pub fn from_bps(bps: u32) -> CoreResult<Self> {
        Rate::new(Decimal::new(i64::from(bps), 4))
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        Rate(Decimal::ZERO)
    }

    /// The full rate (100%).
    #[inline]
    pub const fn one() -> Self {
        Rate(Decimal::ONE)
    }

    /// Returns the underlying decimal fraction.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Checks if the rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::zero()
    }
}

impl TryFrom<Decimal> for Rate {
    type Error = CoreError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Rate::new(value)
    }
}

impl From<Rate> for Decimal {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

/// Shows the rate as a percentage (`14%`), for logs.
impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", (self.0 * Decimal::ONE_HUNDRED).normalize())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Deserialization runs the same checks as [`Product::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProduct")]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Price per unit, never negative.
    pub unit_price: Money,

    /// Category used by discount rule filters.
    pub category: String,

    /// Units on hand, never negative.
    pub stock: i64,
}

impl Product {
    /// Creates a validated product.
    ///
    /// ## Rules
    /// - name: non-empty, at most 200 characters
    /// - category: non-empty, at most 100 characters
    /// - unit_price ≥ 0, stock ≥ 0
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::{Money, Product};
    ///
    /// let chocolate = Product::new(1, "Chocolate", Money::from_cents(1500), "Sweets", 10).unwrap();
    /// assert_eq!(chocolate.stock, 10);
    ///
    /// assert!(Product::new(2, "Broken", Money::from_cents(-1), "Sweets", 1).is_err());
    /// ```
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Money,
        category: impl Into<String>,
        stock: i64,
    ) -> ValidationResult<Self> {
        let name = name.into();
        let category = category.into();

        validate_product_name(&name)?;
        validate_category(&category)?;
        validate_non_negative_amount("unit price", unit_price)?;
        validate_stock(stock)?;

        Ok(Product {
            id: id.into(),
            name,
            unit_price,
            category,
            stock,
        })
    }

    /// Returns a copy of this product with a different stock level.
    pub fn with_stock(&self, stock: i64) -> ValidationResult<Self> {
        validate_stock(stock)?;
        Ok(Product {
            stock,
            ..self.clone()
        })
    }

    /// Checks whether `quantity` units can be taken from stock.
    #[inline]
    pub fn can_supply(&self, quantity: i64) -> bool {
        quantity <= self.stock
    }
}

/// Unvalidated wire shape of [`Product`].
#[derive(Deserialize)]
struct RawProduct {
    id: ProductId,
    name: String,
    unit_price: Money,
    category: String,
    stock: i64,
}

impl TryFrom<RawProduct> for Product {
    type Error = ValidationError;

    fn try_from(raw: RawProduct) -> Result<Self, Self::Error> {
        Product::new(raw.id, raw.name, raw.unit_price, raw.category, raw.stock)
    }
}

// =============================================================================
// Shipping Tiers
// =============================================================================

/// Three flat shipping fees selected by total item count.
///
/// ```text
///   items:   0 │ 1 ─── 5 │ 6 ─── 10 │ 11 ───►
///   fee:     0 │  tier1  │  tier2   │  tier3
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingTiers {
    pub tier1: Money,
    pub tier2: Money,
    pub tier3: Money,
}

impl ShippingTiers {
    /// Creates validated tiers (each fee ≥ 0).
    pub fn new(tier1: Money, tier2: Money, tier3: Money) -> ValidationResult<Self> {
        let tiers = ShippingTiers {
            tier1,
            tier2,
            tier3,
        };
        tiers.validate()?;
        Ok(tiers)
    }

    /// Checks that no tier is negative.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_non_negative_amount("shipping tier1", self.tier1)?;
        validate_non_negative_amount("shipping tier2", self.tier2)?;
        validate_non_negative_amount("shipping tier3", self.tier3)
    }
}

// =============================================================================
// Checkout Configuration
// =============================================================================

/// Immutable pricing configuration supplied by the caller at checkout time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Tax applied to the (discounted) subtotal.
    pub tax_rate: Rate,

    /// Shipping fees by item count.
    pub shipping_tiers: ShippingTiers,
}

impl CheckoutConfig {
    /// Creates a checkout configuration.
    pub const fn new(tax_rate: Rate, shipping_tiers: ShippingTiers) -> Self {
        CheckoutConfig {
            tax_rate,
            shipping_tiers,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_bounds() {
        assert!(Rate::new(Decimal::ZERO).is_ok());
        assert!(Rate::new(Decimal::ONE).is_ok());
        assert_eq!(
            Rate::new(Decimal::new(-1, 2)),
            Err(CoreError::InvalidRate {
                rate: Decimal::new(-1, 2)
            })
        );
        assert!(Rate::new(Decimal::new(10001, 4)).is_err());
    }

    #[test]
    fn test_rate_from_bps() {
        let rate = Rate::from_bps(825).unwrap();
        assert_eq!(rate.value(), Decimal::new(825, 4));
        assert!(Rate::from_bps(10001).is_err());
    }

    #[test]
    fn test_rate_display() {
        assert_eq!(Rate::new(Decimal::new(14, 2)).unwrap().to_string(), "14%");
        assert_eq!(Rate::from_bps(825).unwrap().to_string(), "8.25%");
    }

    #[test]
    fn test_rate_deserialize_rejects_out_of_range() {
        let ok: Rate = serde_json::from_str("\"0.14\"").unwrap();
        assert_eq!(ok.value(), Decimal::new(14, 2));

        assert!(serde_json::from_str::<Rate>("\"1.5\"").is_err());
    }

    #[test]
    fn test_product_validation() {
        assert!(Product::new(1, "Chocolate", Money::from_cents(1500), "Sweets", 10).is_ok());
        assert!(Product::new(1, "Free sample", Money::zero(), "Sweets", 0).is_ok());

        assert!(matches!(
            Product::new(1, "", Money::from_cents(1500), "Sweets", 10),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            Product::new(1, "Chocolate", Money::from_cents(1500), "Sweets", -1),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_product_deserialize_validates() {
        let ok: Product = serde_json::from_str(
            r#"{"id":1,"name":"Chocolate","unit_price":1500,"category":"Sweets","stock":10}"#,
        )
        .unwrap();
        assert_eq!(ok, Product::new(1, "Chocolate", Money::from_cents(1500), "Sweets", 10).unwrap());

        let negative_price = r#"{"id":2,"name":"Broken","unit_price":-500,"category":"Sweets","stock":5}"#;
        assert!(serde_json::from_str::<Product>(negative_price).is_err());

        let negative_stock = r#"{"id":3,"name":"Broken","unit_price":500,"category":"Sweets","stock":-1}"#;
        assert!(serde_json::from_str::<Product>(negative_stock).is_err());

        let empty_name = r#"{"id":4,"name":"","unit_price":500,"category":"Sweets","stock":1}"#;
        assert!(serde_json::from_str::<Product>(empty_name).is_err());
    }

    #[test]
    fn test_product_with_stock_is_copy() {
        let original = Product::new(1, "Chocolate", Money::from_cents(1500), "Sweets", 10).unwrap();
        let updated = original.with_stock(8).unwrap();

        assert_eq!(original.stock, 10);
        assert_eq!(updated.stock, 8);
        assert_eq!(updated.name, original.name);
        assert!(original.with_stock(-2).is_err());
    }

    #[test]
    fn test_can_supply() {
        let product = Product::new(1, "Chocolate", Money::from_cents(1500), "Sweets", 10).unwrap();
        assert!(product.can_supply(10));
        assert!(!product.can_supply(11));
    }

    #[test]
    fn test_shipping_tiers_reject_negative() {
        assert!(ShippingTiers::new(
            Money::from_cents(1000),
            Money::from_cents(2000),
            Money::from_cents(3000)
        )
        .is_ok());
        assert!(ShippingTiers::new(Money::zero(), Money::from_cents(-1), Money::zero()).is_err());
    }
}
