//! # Validation Module
//!
//! Input validation for values entering the core: products, shipping
//! tiers and discount rules.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Constructors (THIS MODULE)                                   │
//! │  ├── Product::new, ShippingTiers::new, DiscountRule::validate          │
//! │  └── Returns ValidationError                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Operations (cart, pricing, checkout)                         │
//! │  ├── InvalidQuantity, NotFound, InsufficientStock, InvalidRate ...     │
//! │  └── Returns CoreError                                                 │
//! │                                                                         │
//! │  Quantities passed to cart operations are NOT checked here: a bad      │
//! │  quantity is an operation error (`CoreError::InvalidQuantity`).        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_product_name, validate_stock};
//!
//! assert!(validate_product_name("Chocolate").is_ok());
//! assert!(validate_stock(-1).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Longest accepted category or rule name.
pub const MAX_LABEL_LEN: usize = 100;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_label("name", name, MAX_PRODUCT_NAME_LEN)
}

/// Validates a product category.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_label("category", category, MAX_LABEL_LEN)
}

/// Validates a discount rule identifier or display name.
pub fn validate_rule_label(field: &str, value: &str) -> ValidationResult<()> {
    validate_label(field, value, MAX_LABEL_LEN)
}

fn validate_label(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a stock level.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (sold out)
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates that an amount is not negative.
///
/// Used for unit prices, shipping tiers, fixed discounts and minimum
/// purchase thresholds. Zero is allowed.
///
/// ## Example
/// ```rust
/// use tally_core::money::Money;
/// use tally_core::validation::validate_non_negative_amount;
///
/// assert!(validate_non_negative_amount("price", Money::from_cents(1099)).is_ok());
/// assert!(validate_non_negative_amount("price", Money::zero()).is_ok());
/// assert!(validate_non_negative_amount("price", Money::from_cents(-100)).is_err());
/// ```
pub fn validate_non_negative_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a count that must be at least 1 (buy/free units).
pub fn validate_positive_count(field: &str, count: u32) -> ValidationResult<()> {
    if count == 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an optional minimum-quantity filter.
pub fn validate_minimum_quantity(minimum: i64) -> ValidationResult<()> {
    if minimum < 0 {
        return Err(ValidationError::OutOfRange {
            field: "minimum quantity".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Chocolate").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("Sweets").is_ok());
        assert_eq!(
            validate_category(""),
            Err(ValidationError::Required {
                field: "category".to_string()
            })
        );
        assert!(validate_category(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(20).is_ok());
        assert!(validate_stock(-1).is_err());
    }

    #[test]
    fn test_validate_positive_count() {
        assert!(validate_positive_count("buy", 1).is_ok());
        assert_eq!(
            validate_positive_count("buy", 0),
            Err(ValidationError::MustBePositive {
                field: "buy".to_string()
            })
        );
    }

    #[test]
    fn test_validate_minimum_quantity() {
        assert!(validate_minimum_quantity(0).is_ok());
        assert!(validate_minimum_quantity(3).is_ok());
        assert!(validate_minimum_quantity(-3).is_err());
    }
}
