//! # Session Error Types
//!
//! Errors surfaced by the session layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tally                                  │
//! │                                                                         │
//! │  tally-core                         tally-session                       │
//! │  ──────────                         ─────────────                       │
//! │                                                                         │
//! │  ValidationError ──► CoreError ──► SessionError::Core ──┐               │
//! │                                                         │               │
//! │  config file ─── io::Error ──────► SessionError::Io ────┤               │
//! │              ─── toml::de::Error ► SessionError::TomlParse              │
//! │  env / rules ────────────────────► SessionError::InvalidConfig          │
//! │                                                         │               │
//! │                                                         ▼               │
//! │                                           code() ──► ErrorCode          │
//! │                                           "INSUFFICIENT_STOCK"          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A front end branches on [`ErrorCode`] and renders its own text; the
//! `Display` output is meant for logs.

use serde::Serialize;
use tally_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Session error type.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A cart, pricing or checkout operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Configuration values are inconsistent or out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No usable config file location.
    #[error("Failed to load config: {0}")]
    ConfigLoad(String),

    /// Reading the config file failed.
    #[error("Config file I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("Config file parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::Core(CoreError::Validation(err))
    }
}

/// Machine-readable error codes.
///
/// ## Serialization
/// ```json
/// "INSUFFICIENT_STOCK"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product missing from the catalog
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Cart operation rejected (bad quantity, product not in cart, empty cart)
    CartError,

    /// Not enough stock to cover the cart
    InsufficientStock,

    /// Configuration could not be loaded or is invalid
    ConfigError,
}

impl SessionError {
    /// Maps this error to its machine-readable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::Core(core) => match core {
                CoreError::NotFound(_) => ErrorCode::NotFound,
                CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
                CoreError::InvalidQuantity { .. }
                | CoreError::NotInCart(_)
                | CoreError::EmptyCart => ErrorCode::CartError,
                CoreError::InvalidRate { .. } | CoreError::Validation(_) => {
                    ErrorCode::ValidationError
                }
            },
            SessionError::InvalidConfig(_)
            | SessionError::ConfigLoad(_)
            | SessionError::Io(_)
            | SessionError::TomlParse(_) => ErrorCode::ConfigError,
        }
    }
}

/// Serializable error payload for a presentation layer.
///
/// ```json
/// { "code": "NOT_FOUND", "message": "Product not found: 42" }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&SessionError> for ErrorReport {
    fn from(err: &SessionError) -> Self {
        ErrorReport {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::ProductId;

    #[test]
    fn test_core_error_codes() {
        let cases = [
            (CoreError::NotFound(ProductId(1)), ErrorCode::NotFound),
            (
                CoreError::InsufficientStock {
                    product_id: ProductId(1),
                    needed: 3,
                    available: 2,
                },
                ErrorCode::InsufficientStock,
            ),
            (CoreError::InvalidQuantity { quantity: 0 }, ErrorCode::CartError),
            (CoreError::NotInCart(ProductId(9)), ErrorCode::CartError),
            (CoreError::EmptyCart, ErrorCode::CartError),
        ];

        for (core, code) in cases {
            assert_eq!(SessionError::from(core).code(), code);
        }
    }

    #[test]
    fn test_validation_error_is_wrapped() {
        let err = SessionError::from(ValidationError::Required {
            field: "name".to_string(),
        });

        assert!(matches!(err, SessionError::Core(CoreError::Validation(_))));
        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[test]
    fn test_config_error_code() {
        let err = SessionError::InvalidConfig("bad".to_string());
        assert_eq!(err.code(), ErrorCode::ConfigError);
        assert_eq!(err.to_string(), "Invalid configuration: bad");
    }

    #[test]
    fn test_error_report_serialization() {
        let err = SessionError::from(CoreError::NotFound(ProductId(42)));
        let json = serde_json::to_value(ErrorReport::from(&err)).unwrap();

        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: 42");
    }
}
