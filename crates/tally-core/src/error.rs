//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Cart, pricing and checkout failures            │
//! │  └── ValidationError  - Constructor-level input validation             │
//! │                                                                         │
//! │  tally-session errors (separate crate)                                 │
//! │  └── SessionError     - Config loading + wrapped CoreError             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → SessionError → caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Carry ids and quantities so a presentation layer can render its own text
//! 3. Errors are enum variants, never String
//! 4. `Display` output is for logs, not for end users

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every fallible operation in this crate returns one of these as a value.
/// Nothing is retried or recovered internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Quantity argument below 1 on add/remove.
    #[error("Invalid quantity {quantity}: must be at least 1")]
    InvalidQuantity { quantity: i64 },

    /// Product id is not present in the catalog.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// Requested cart quantity exceeds available stock.
    ///
    /// ## User Workflow
    /// ```text
    /// Add to Cart (qty: 5, already in cart: 2)
    ///      │
    ///      ▼
    /// Check stock: available=6, needed=7
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 1, needed: 7, available: 6 }
    ///      │
    ///      ▼
    /// UI shows: "Only 6 in stock"
    /// ```
    #[error("Insufficient stock for product {product_id}: needed {needed}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        needed: i64,
        available: i64,
    },

    /// Removal requested for a product that has no cart entry.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Rate outside the closed interval [0, 1].
    #[error("Invalid rate {rate}: must be between 0 and 1")]
    InvalidRate { rate: Decimal },

    /// Checkout attempted on a cart with no entries.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by constructors (`Product::new`, `DiscountRule::new`, ...) before
/// a value ever reaches the business logic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Duplicate value (e.g., two catalog products sharing an id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
