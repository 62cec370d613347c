//! # tally-session: Checkout Session for Tally
//!
//! Wraps the pure `tally-core` operations in a stateful session with
//! configuration loading and logging setup.
//!
//! ## Modules
//!
//! - [`config`] - TOML + environment configuration (tax, shipping, discount rules)
//! - [`session`] - The `Session` value: cart, catalog snapshot, checkout
//! - [`error`] - `SessionError` and machine-readable `ErrorCode`s
//! - [`telemetry`] - `tracing` subscriber setup
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{Catalog, MemoryOrderSink, Money, Product, ProductId};
//! use tally_session::{Session, SessionConfig};
//!
//! let config = SessionConfig::from_toml_str(r#"
//!     [checkout]
//!     tax_rate = "0.14"
//!
//!     [[discounts]]
//!     id = "b2g1"
//!     name = "Buy 2 get 1"
//!     kind = { type = "buy_x_get_y", buy = 2, free = 1 }
//! "#).unwrap();
//!
//! let catalog = Catalog::from_products([
//!     Product::new(1, "Chocolate", Money::from_cents(1500), "Sweets", 10).unwrap(),
//! ])
//! .unwrap();
//!
//! let mut session = Session::new(config, catalog).unwrap();
//! session.add_item(ProductId(1), 3).unwrap();
//!
//! let mut sink = MemoryOrderSink::new();
//! let summary = session.checkout(&mut sink).unwrap();
//!
//! assert_eq!(summary.discount_rule.as_deref(), Some("b2g1"));
//! assert_eq!(summary.order.total(), Money::from_cents(4420));
//! assert_eq!(session.catalog().stock_of(ProductId(1)), Some(7));
//! ```

pub mod config;
pub mod error;
pub mod session;
pub mod telemetry;

pub use config::{CheckoutSettings, SessionConfig};
pub use error::{ErrorCode, ErrorReport, SessionError, SessionResult};
pub use session::{CheckoutSummary, Session};
pub use telemetry::init_tracing;
