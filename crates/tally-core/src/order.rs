//! # Order
//!
//! The immutable record produced by a successful checkout.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Order                                                        │
//! │   order_id ........ UUID v4                                  │
//! │   receipt_number .. 240315-142233-0042                       │
//! │   items ........... cart entry snapshots                     │
//! │   subtotal ─ discount + tax + shipping = total               │
//! │   created_at ...... UTC                                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fields are private: an order is only ever built by checkout and never
//! edited afterwards.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::cart::CartEntry;
use crate::money::Money;

/// A completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    order_id: Uuid,
    receipt_number: String,
    items: Vec<CartEntry>,
    subtotal: Money,
    discount: Money,
    tax: Money,
    shipping: Money,
    total: Money,
    created_at: DateTime<Utc>,
}

/// Priced amounts for an order, computed by checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OrderAmounts {
    pub subtotal: Money,
    pub discount: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

impl Order {
    /// Stamps a new order with a fresh id, receipt number and timestamp.
    pub(crate) fn new(items: Vec<CartEntry>, amounts: OrderAmounts) -> Self {
        let created_at = Utc::now();

        Order {
            order_id: Uuid::new_v4(),
            receipt_number: generate_receipt_number(created_at),
            items,
            subtotal: amounts.subtotal,
            discount: amounts.discount,
            tax: amounts.tax,
            shipping: amounts.shipping,
            total: amounts.total,
            created_at,
        }
    }

    pub fn order_id(&self) -> Uuid {
        self.order_id
    }

    /// Human-readable receipt number (`YYMMDD-HHMMSS-NNNN`).
    pub fn receipt_number(&self) -> &str {
        &self.receipt_number
    }

    /// Cart lines as they were at checkout, in product id order.
    pub fn items(&self) -> &[CartEntry] {
        &self.items
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn shipping(&self) -> Money {
        self.shipping
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(CartEntry::quantity).sum()
    }
}

/// Formats a receipt number from the checkout time.
///
/// The trailing four digits come from the sub-second clock, so two orders
/// within the same second almost always differ.
fn generate_receipt_number(now: DateTime<Utc>) -> String {
    format!(
        "{}-{:04}",
        now.format("%y%m%d-%H%M%S"),
        now.timestamp_subsec_nanos() % 10_000
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn amounts() -> OrderAmounts {
        OrderAmounts {
            subtotal: Money::from_cents(6000),
            discount: Money::zero(),
            tax: Money::from_cents(840),
            shipping: Money::from_cents(1000),
            total: Money::from_cents(7840),
        }
    }

    #[test]
    fn test_receipt_number_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 14, 22, 33).unwrap()
            + chrono::Duration::nanoseconds(120_042);

        assert_eq!(generate_receipt_number(at), "240315-142233-0042");
    }

    #[test]
    fn test_new_order_has_unique_id() {
        let a = Order::new(Vec::new(), amounts());
        let b = Order::new(Vec::new(), amounts());

        assert_ne!(a.order_id(), b.order_id());
        assert_eq!(a.order_id().get_version_num(), 4);
        assert_eq!(a.receipt_number().len(), "240315-142233-0042".len());
        assert_eq!(a.total(), Money::from_cents(7840));
        assert_eq!(a.total_quantity(), 0);
    }

    #[test]
    fn test_order_serializes_amounts_as_cents() {
        let order = Order::new(Vec::new(), amounts());
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["total"], 7840);
        assert_eq!(json["tax"], 840);
        assert!(json["items"].as_array().unwrap().is_empty());
    }
}
