//! # Order Sink
//!
//! The single seam through which a completed order leaves the core.
//!
//! The core never opens files or connections. A caller that wants orders
//! persisted implements [`OrderSink`] over its own storage and hands it to
//! [`checkout_and_save`](crate::checkout::checkout_and_save).

use std::convert::Infallible;

use crate::order::Order;

/// Destination for completed orders.
pub trait OrderSink {
    /// Failure reported by the backing store.
    type Error: std::error::Error;

    /// Persists `order` and returns where it was stored.
    fn save(&mut self, order: &Order) -> Result<String, Self::Error>;
}

/// Keeps orders in memory. Never fails.
///
/// ## Example
/// ```rust
/// use tally_core::{MemoryOrderSink, OrderSink};
///
/// let sink = MemoryOrderSink::new();
/// assert!(sink.orders().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderSink {
    orders: Vec<Order>,
}

impl MemoryOrderSink {
    pub fn new() -> Self {
        MemoryOrderSink::default()
    }

    /// Orders saved so far, oldest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }
}

impl OrderSink for MemoryOrderSink {
    type Error = Infallible;

    fn save(&mut self, order: &Order) -> Result<String, Self::Error> {
        self.orders.push(order.clone());
        Ok(format!("memory://orders/{}", self.orders.len()))
    }
}
