//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Prices, subtotals, discounts, tax, shipping: all i64 cents          │
//! │    Rates (tax, percentage discounts): exact `Decimal` in [0, 1]        │
//! │    Cents × Rate is rounded ONCE, half away from zero                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let price = Money::from_cents(1500); // $15.00
//!
//! let line = price * 2;                          // $30.00
//! let total = line + Money::from_cents(1000);    // $40.00
//! assert_eq!(total.cents(), 4000);
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::Rate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Subtraction is total; invariants (non-negative prices,
///   bounded discounts) are enforced where values are constructed
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serde**: serializes as a bare integer of cents
///
/// ## Where Money is Used
/// ```text
/// Product.unit_price ──► CartEntry line total ──► cart subtotal
///                                                      │
///            discount (≤ subtotal) ◄───────────────────┤
///                                                      ▼
///                        tax + shipping ──► Order.total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// Saturates at `i64::MAX` / `i64::MIN` cents instead of wrapping.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1500);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 4500);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Multiplies this amount by a rate and rounds to the nearest cent.
    ///
    /// Midpoints round away from zero: 0.5¢ → 1¢.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_core::money::Money;
    /// use tally_core::types::Rate;
    ///
    /// let subtotal = Money::from_cents(6000);            // $60.00
    /// let rate = Rate::new(Decimal::new(14, 2)).unwrap(); // 14%
    /// assert_eq!(subtotal.apply_rate(rate).cents(), 840); // $8.40
    /// ```
    pub fn apply_rate(&self, rate: Rate) -> Money {
        // |cents × rate| ≤ |cents| because rate ∈ [0, 1]
        let Some(applied) = Decimal::from(self.0).checked_mul(rate.value()) else {
            unreachable!("an i64 scaled by a rate in [0, 1] always fits a Decimal")
        };

        let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let Some(cents) = rounded.to_i64() else {
            unreachable!("an i64 scaled by a rate in [0, 1] always fits an i64")
        };

        Money(cents)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented display (`$12.34`). No locale handling.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        // saturating, like multiply_quantity
        iter.fold(Money::zero(), |acc, m| Money(acc.0.saturating_add(m.0)))
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(mantissa: i64, scale: u32) -> Rate {
        Rate::new(Decimal::new(mantissa, scale)).unwrap()
    }

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(7840)), "$78.40");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let mut c = a;
        c += b;
        c -= Money::from_cents(100);
        assert_eq!(c.cents(), 1400);
    }

    #[test]
    fn test_sum() {
        let lines = [Money::from_cents(3000), Money::from_cents(3000), Money::from_cents(500)];
        let total: Money = lines.iter().sum();
        assert_eq!(total.cents(), 6500);

        let empty: Money = Vec::<Money>::new().into_iter().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_large_amounts_saturate() {
        let huge = Money::from_cents(i64::MAX / 2);

        assert_eq!(huge.multiply_quantity(3).cents(), i64::MAX);
        assert_eq!((huge * 3).cents(), i64::MAX);
        assert_eq!(Money::from_cents(-5).multiply_quantity(i64::MAX).cents(), i64::MIN);

        let total: Money = [huge, huge, huge].iter().sum();
        assert_eq!(total.cents(), i64::MAX);
    }

    #[test]
    fn test_apply_rate_exact() {
        assert_eq!(Money::from_cents(6000).apply_rate(rate(14, 2)).cents(), 840);
        assert_eq!(Money::from_cents(6500).apply_rate(rate(20, 2)).cents(), 1300);
        assert_eq!(Money::from_cents(6500).apply_rate(Rate::zero()).cents(), 0);
        assert_eq!(Money::from_cents(6500).apply_rate(Rate::one()).cents(), 6500);
    }

    #[test]
    fn test_apply_rate_rounds_half_away_from_zero() {
        // $10.00 at 8.25% = 82.5¢ → 83¢
        assert_eq!(Money::from_cents(1000).apply_rate(rate(825, 4)).cents(), 83);
        // -$10.00 at 8.25% = -82.5¢ → -83¢
        assert_eq!(Money::from_cents(-1000).apply_rate(rate(825, 4)).cents(), -83);
        // 1¢ at 49% = 0.49¢ → 0¢
        assert_eq!(Money::from_cents(1).apply_rate(rate(49, 2)).cents(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }

    #[test]
    fn test_serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(1500)).unwrap();
        assert_eq!(json, "1500");

        let back: Money = serde_json::from_str("1500").unwrap();
        assert_eq!(back, Money::from_cents(1500));
    }
}
