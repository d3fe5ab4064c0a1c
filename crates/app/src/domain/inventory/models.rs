//! Inventory Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::domain::products::models::ProductId;

/// Inventory Record
///
/// The authoritative stock count of one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRecord {
    /// The product the stock belongs to.
    pub product_id: ProductId,

    /// Units in stock.
    pub quantity: u64,

    /// When the row was created.
    pub created_at: Timestamp,

    /// When the stock last changed.
    pub updated_at: Timestamp,
}

/// Inventory View
///
/// The snapshot handed to readers and kept in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryView {
    /// The product the stock belongs to.
    pub product_id: ProductId,

    /// Units in stock.
    pub quantity: u64,

    /// When the stock last changed.
    pub updated_at: Timestamp,
}

impl From<InventoryRecord> for InventoryView {
    fn from(record: InventoryRecord) -> Self {
        Self {
            product_id: record.product_id,
            quantity: record.quantity,
            updated_at: record.updated_at,
        }
    }
}

/// Outcome of a reservation that reached the stock check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reservation {
    /// Stock was decremented and committed.
    Reserved {
        /// The product reserved.
        product_id: ProductId,

        /// Units taken out of stock.
        reserved: u64,

        /// Units left after the reservation.
        remaining: u64,
    },

    /// Not enough stock; nothing was written.
    InsufficientStock {
        /// The product asked for.
        product_id: ProductId,

        /// Units asked for.
        requested: u64,

        /// Units in stock when the request was checked.
        available: u64,
    },
}

impl Reservation {
    /// Whether stock was actually taken.
    #[must_use]
    pub fn is_reserved(&self) -> bool {
        matches!(self, Self::Reserved { .. })
    }
}
