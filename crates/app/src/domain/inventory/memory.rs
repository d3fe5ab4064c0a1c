//! Embedded inventory storage.
//!
//! Same locking contract as the `PostgreSQL` storage, kept in process: each row
//! has an async mutex standing in for the row lock, and committed records live
//! in a separate map so plain reads never wait on a lock holder.

use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use dashmap::DashMap;
use jiff::Timestamp;
use tokio::{
    sync::{Mutex, OwnedMutexGuard},
    time::timeout,
};

use crate::domain::{
    inventory::{
        errors::{ConflictReason, StorageError},
        models::InventoryRecord,
        storage::{InventoryStorage, InventoryTransaction, LockedInventory},
    },
    products::models::ProductId,
};

#[derive(Debug, Default)]
struct Tables {
    records: DashMap<ProductId, InventoryRecord>,
    locks: DashMap<ProductId, Arc<Mutex<()>>>,
}

/// Embedded inventory storage with per-row async locks.
///
/// Committed rows sit in a concurrent map, so plain reads never wait on a lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryStorage {
    tables: Arc<Tables>,
}

impl InMemoryInventoryStorage {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite the inventory row of `product`.
    pub fn insert(&self, product: ProductId, quantity: u64) -> InventoryRecord {
        let now = Timestamp::now();

        let record = InventoryRecord {
            product_id: product,
            quantity,
            created_at: now,
            updated_at: now,
        };

        self.tables.locks.entry(product).or_default();
        self.tables.records.insert(product, record.clone());

        record
    }

    fn committed(&self, product: ProductId) -> Result<InventoryRecord, StorageError> {
        self.tables
            .records
            .get(&product)
            .map(|record| record.value().clone())
            .ok_or(StorageError::NotFound)
    }

    fn row_lock(&self, product: ProductId) -> Result<Arc<Mutex<()>>, StorageError> {
        self.tables
            .locks
            .get(&product)
            .map(|lock| Arc::clone(lock.value()))
            .ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl InventoryStorage for InMemoryInventoryStorage {
    async fn get_inventory(&self, product: ProductId) -> Result<InventoryRecord, StorageError> {
        self.committed(product)
    }

    async fn begin(
        &self,
        lock_timeout: Duration,
    ) -> Result<Box<dyn InventoryTransaction>, StorageError> {
        Ok(Box::new(InMemoryTransaction {
            storage: self.clone(),
            lock_timeout,
            held: HashMap::new(),
            pending: HashMap::new(),
        }))
    }
}

/// Open embedded transaction. Pending decrements are discarded when dropped.
#[derive(Debug)]
pub struct InMemoryTransaction {
    storage: InMemoryInventoryStorage,
    lock_timeout: Duration,
    held: HashMap<ProductId, OwnedMutexGuard<()>>,
    pending: HashMap<ProductId, u64>,
}

impl InMemoryTransaction {
    /// The committed record with this transaction's pending decrements applied.
    fn project(&self, product: ProductId) -> Result<InventoryRecord, StorageError> {
        let mut record = self.storage.committed(product)?;
        let pending = self.pending.get(&product).copied().unwrap_or_default();

        record.quantity = record
            .quantity
            .checked_sub(pending)
            .ok_or(StorageError::NegativeQuantity)?;

        Ok(record)
    }
}

#[async_trait]
impl InventoryTransaction for InMemoryTransaction {
    async fn lock_for_update(
        &mut self,
        product: ProductId,
    ) -> Result<LockedInventory, StorageError> {
        if !self.held.contains_key(&product) {
            let lock = self.storage.row_lock(product)?;

            let guard = timeout(self.lock_timeout, lock.lock_owned())
                .await
                .map_err(|_elapsed| StorageError::Conflict(ConflictReason::LockTimeout))?;

            self.held.insert(product, guard);
        }

        Ok(LockedInventory::new(self.project(product)?))
    }

    async fn decrement(
        &mut self,
        locked: &LockedInventory,
        amount: u64,
    ) -> Result<Option<InventoryRecord>, StorageError> {
        let product = locked.product_id();

        if !self.held.contains_key(&product) {
            return Err(StorageError::NotLocked);
        }

        let mut record = self.project(product)?;

        let Some(remaining) = record.quantity.checked_sub(amount) else {
            return Ok(None);
        };

        *self.pending.entry(product).or_default() += amount;

        record.quantity = remaining;
        record.updated_at = Timestamp::now();

        Ok(Some(record))
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        let Self {
            storage,
            held,
            pending,
            ..
        } = *self;

        // Validate every write before applying any, so a commit is all-or-nothing.
        for (product, amount) in &pending {
            let committed = storage.committed(*product)?;

            if committed.quantity < *amount {
                return Err(StorageError::NegativeQuantity);
            }
        }

        let now = Timestamp::now();

        for (product, amount) in pending {
            if let Some(mut record) = storage.tables.records.get_mut(&product) {
                record.quantity -= amount;
                record.updated_at = now;
            }
        }

        drop(held);

        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        Ok(())
    }
}
