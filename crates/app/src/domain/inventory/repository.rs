//! Inventory Repository

use std::{
    collections::HashSet,
    fmt::{Debug, Formatter, Result as FmtResult},
    time::Duration,
};

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgExecutor, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::Db,
    domain::{
        inventory::{
            errors::StorageError,
            models::InventoryRecord,
            storage::{InventoryStorage, InventoryTransaction, LockedInventory},
        },
        products::models::ProductId,
    },
};

const GET_INVENTORY_SQL: &str = include_str!("sql/get_inventory.sql");
const LOCK_INVENTORY_SQL: &str = include_str!("sql/lock_inventory.sql");
const DECREMENT_INVENTORY_SQL: &str = include_str!("sql/decrement_inventory.sql");
const CREATE_INVENTORY_SQL: &str = include_str!("sql/create_inventory.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgInventoryRepository;

impl PgInventoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_inventory<'c>(
        &self,
        executor: impl PgExecutor<'c>,
        product: ProductId,
    ) -> Result<InventoryRecord, sqlx::Error> {
        query_as::<Postgres, InventoryRecord>(GET_INVENTORY_SQL)
            .bind(product.into_inner())
            .fetch_one(executor)
            .await
    }

    pub(crate) async fn lock_inventory(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
    ) -> Result<InventoryRecord, sqlx::Error> {
        query_as::<Postgres, InventoryRecord>(LOCK_INVENTORY_SQL)
            .bind(product.into_inner())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn decrement_inventory(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
        amount: i64,
    ) -> Result<Option<InventoryRecord>, sqlx::Error> {
        query_as::<Postgres, InventoryRecord>(DECREMENT_INVENTORY_SQL)
            .bind(product.into_inner())
            .bind(amount)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_inventory(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductId,
        quantity: i64,
    ) -> Result<InventoryRecord, sqlx::Error> {
        query_as::<Postgres, InventoryRecord>(CREATE_INVENTORY_SQL)
            .bind(product.into_inner())
            .bind(quantity)
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for InventoryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity_i64: i64 = row.try_get("quantity")?;

        let quantity = u64::try_from(quantity_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "quantity".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            product_id: ProductId::from_db(row.try_get("product_id")?),
            quantity,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

/// `PostgreSQL` inventory storage using `SELECT ... FOR UPDATE` row locks.
#[derive(Debug, Clone)]
pub struct PgInventoryStorage {
    db: Db,
    repository: PgInventoryRepository,
}

impl PgInventoryStorage {
    /// Storage over the tables in `db`.
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgInventoryRepository::new(),
        }
    }
}

#[async_trait]
impl InventoryStorage for PgInventoryStorage {
    async fn get_inventory(&self, product: ProductId) -> Result<InventoryRecord, StorageError> {
        Ok(self
            .repository
            .get_inventory(self.db.pool(), product)
            .await?)
    }

    async fn begin(
        &self,
        lock_timeout: Duration,
    ) -> Result<Box<dyn InventoryTransaction>, StorageError> {
        let tx = self.db.begin_locking_transaction(lock_timeout).await?;

        Ok(Box::new(PgInventoryTransaction {
            tx,
            repository: self.repository.clone(),
            locked: HashSet::new(),
        }))
    }
}

/// An open `PostgreSQL` transaction. Rolls back when dropped unfinished.
pub struct PgInventoryTransaction {
    tx: Transaction<'static, Postgres>,
    repository: PgInventoryRepository,
    locked: HashSet<ProductId>,
}

impl Debug for PgInventoryTransaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PgInventoryTransaction")
            .field("locked", &self.locked)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl InventoryTransaction for PgInventoryTransaction {
    async fn lock_for_update(
        &mut self,
        product: ProductId,
    ) -> Result<LockedInventory, StorageError> {
        let record = self.repository.lock_inventory(&mut self.tx, product).await?;

        self.locked.insert(product);

        Ok(LockedInventory::new(record))
    }

    async fn decrement(
        &mut self,
        locked: &LockedInventory,
        amount: u64,
    ) -> Result<Option<InventoryRecord>, StorageError> {
        let product = locked.product_id();

        if !self.locked.contains(&product) {
            return Err(StorageError::NotLocked);
        }

        let amount = i64::try_from(amount)?;

        Ok(self
            .repository
            .decrement_inventory(&mut self.tx, product, amount)
            .await?)
    }

    async fn commit(self: Box<Self>) -> Result<(), StorageError> {
        let Self { tx, .. } = *self;

        Ok(tx.commit().await?)
    }

    async fn rollback(self: Box<Self>) -> Result<(), StorageError> {
        let Self { tx, .. } = *self;

        Ok(tx.rollback().await?)
    }
}
