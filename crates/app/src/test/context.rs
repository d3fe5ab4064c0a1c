//! Test context for service-level integration tests.

use std::sync::Arc;

use crate::{
    cache::{BestEffortCache, DEFAULT_OPERATION_TIMEOUT, MemoryStore},
    database::Db,
    domain::{
        inventory::{CachedInventoryService, InventorySettings, PgInventoryStorage},
        products::PgProductsService,
    },
};

use super::db::TestDb;

/// Services wired against a fresh database and an in-process cache.
pub struct TestContext {
    pub db: TestDb,
    pub cache: Arc<MemoryStore>,
    pub storage: PgInventoryStorage,
    pub inventory: CachedInventoryService,
    pub products: PgProductsService,
}

impl TestContext {
    pub async fn new() -> Self {
        let db = TestDb::new().await;
        let pool = Db::new(db.pool().clone());

        let cache = Arc::new(MemoryStore::new());
        let best_effort = BestEffortCache::new(cache.clone(), DEFAULT_OPERATION_TIMEOUT);
        let settings = InventorySettings::default();

        let storage = PgInventoryStorage::new(pool.clone());

        Self {
            inventory: CachedInventoryService::new(
                Arc::new(storage.clone()),
                best_effort.clone(),
                settings,
            ),
            products: PgProductsService::new(pool, best_effort, settings.cache_ttl),
            storage,
            cache,
            db,
        }
    }
}
