//! Inventory storage contract.
//!
//! A reservation runs entirely inside one [`InventoryTransaction`]:
//! lock the row, check, decrement, commit. Dropping a transaction that was
//! neither committed nor rolled back discards its writes.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    inventory::{errors::StorageError, models::InventoryRecord},
    products::models::ProductId,
};

/// Proof that a row is exclusively locked by the transaction that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedInventory {
    record: InventoryRecord,
}

impl LockedInventory {
    pub(crate) fn new(record: InventoryRecord) -> Self {
        Self { record }
    }

    /// The locked product.
    #[must_use]
    pub fn product_id(&self) -> ProductId {
        self.record.product_id
    }

    /// Quantity as seen under the lock.
    #[must_use]
    pub fn quantity(&self) -> u64 {
        self.record.quantity
    }

    /// The row as read under the lock.
    #[must_use]
    pub fn record(&self) -> &InventoryRecord {
        &self.record
    }
}

/// Durable per-product stock with transactional row locks.
#[automock]
#[async_trait]
pub trait InventoryStorage: Send + Sync {
    /// Plain read of committed data. Never waits on row locks.
    async fn get_inventory(&self, product: ProductId) -> Result<InventoryRecord, StorageError>;

    /// Open a transaction whose lock waits give up after `lock_timeout`.
    async fn begin(
        &self,
        lock_timeout: Duration,
    ) -> Result<Box<dyn InventoryTransaction>, StorageError>;
}

/// One storage transaction. Dropping it unfinished rolls it back.
#[async_trait]
pub trait InventoryTransaction: Send {
    /// Take the exclusive row lock for `product`, held until the transaction ends.
    async fn lock_for_update(&mut self, product: ProductId)
    -> Result<LockedInventory, StorageError>;

    /// Relative, conditional decrement of a row locked by this transaction.
    ///
    /// Returns `None` when fewer than `amount` units remain, leaving the row untouched.
    async fn decrement(
        &mut self,
        locked: &LockedInventory,
        amount: u64,
    ) -> Result<Option<InventoryRecord>, StorageError>;

    /// Make every write of this transaction durable.
    async fn commit(self: Box<Self>) -> Result<(), StorageError>;

    /// Discard every write of this transaction.
    async fn rollback(self: Box<Self>) -> Result<(), StorageError>;
}
