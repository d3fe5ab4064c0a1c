//! App Context

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use sqlx::PgPool;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{
    cache::{BestEffortCache, DEFAULT_EVICTION_INTERVAL, MemoryStore, NullStore, RedisStore},
    config::{AppConfig, CacheBackend, CacheConfig},
    database::{self, Db},
    domain::{
        inventory::{
            CachedInventoryService, InventoryService, InventorySettings, PgInventoryStorage,
        },
        products::{PgProductsService, ProductsService},
    },
};

/// Startup failures.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The database could not be reached.
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    /// The redis backend was selected without `REDIS_URL`.
    #[error("REDIS_URL must be set when the redis cache backend is selected")]
    MissingRedisUrl,

    /// A stock-changing process asked for the private memory cache.
    #[error(
        "the memory cache backend is private to one process and cannot invalidate a \
         server's cache; pass --cache-backend redis (shared with the server) or none"
    )]
    ProcessLocalCache,
}

/// Service handles shared by the CLI and the HTTP server.
#[derive(Clone)]
pub struct AppContext {
    /// Inventory reads and reservations.
    pub inventory: Arc<dyn InventoryService>,

    /// Product creation and search.
    pub products: Arc<dyn ProductsService>,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails or the
    /// cache configuration is incomplete. An unreachable Redis server is not
    /// an error: the context starts with caching disabled.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect(
            &config.database.database_url,
            config.database.database_max_connections,
        )
        .await
        .map_err(AppInitError::Database)?;

        let cache = build_cache(&config.cache).await?;

        Ok(Self::from_pool(
            pool,
            cache,
            config.inventory.settings(&config.cache),
        ))
    }

    /// Build a context for a process that changes stock alongside a running
    /// server, such as the CLI.
    ///
    /// # Errors
    ///
    /// Returns [`AppInitError::ProcessLocalCache`] when the memory backend is
    /// selected, since invalidating a private map would leave every server's
    /// cached stock stale. Otherwise fails as [`AppContext::from_config`].
    pub async fn from_config_for_writer(config: &AppConfig) -> Result<Self, AppInitError> {
        if config.cache.cache_backend.is_process_local() {
            return Err(AppInitError::ProcessLocalCache);
        }

        Self::from_config(config).await
    }

    /// Wire `PostgreSQL`-backed services around an existing pool.
    #[must_use]
    pub fn from_pool(
        pool: PgPool,
        cache: BestEffortCache,
        settings: InventorySettings,
    ) -> Self {
        let db = Db::new(pool);

        Self {
            inventory: Arc::new(CachedInventoryService::new(
                Arc::new(PgInventoryStorage::new(db.clone())),
                cache.clone(),
                settings,
            )),
            products: Arc::new(PgProductsService::new(db, cache, settings.cache_ttl)),
        }
    }
}

impl Debug for AppContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

/// Build the cache selected by `config`.
///
/// # Errors
///
/// Returns an error when the redis backend is selected without a URL.
pub async fn build_cache(config: &CacheConfig) -> Result<BestEffortCache, AppInitError> {
    let timeout = config.operation_timeout();

    match config.cache_backend {
        CacheBackend::None => Ok(BestEffortCache::new(Arc::new(NullStore), timeout)),
        CacheBackend::Memory => {
            warn!("memory cache selected, only coherent while this is the sole writer");

            let store = MemoryStore::new();
            store.spawn_eviction(DEFAULT_EVICTION_INTERVAL);

            Ok(BestEffortCache::new(Arc::new(store), timeout))
        }
        CacheBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or(AppInitError::MissingRedisUrl)?;

            match RedisStore::connect(url).await {
                Ok(store) => {
                    info!("connected to redis cache");

                    Ok(BestEffortCache::new(Arc::new(store), timeout))
                }
                Err(error) => {
                    error!(%error, "redis unavailable, continuing with caching disabled");

                    Ok(BestEffortCache::new(Arc::new(NullStore), timeout))
                }
            }
        }
    }
}
