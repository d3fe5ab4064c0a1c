//! Inventory service.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    future::Future,
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use mockall::automock;
use tokio::time::{Instant, timeout_at};
use tracing::{Instrument as _, Span, debug, error, info, instrument, warn};

use crate::{
    cache::{
        BestEffortCache,
        keys::{SEARCH_PREFIX, inventory_key},
    },
    domain::{
        inventory::{
            errors::{ConflictReason, InventoryServiceError, StorageError},
            models::{InventoryView, Reservation},
            storage::{InventoryStorage, InventoryTransaction},
        },
        products::models::ProductId,
    },
};

/// How long a cached inventory snapshot stays valid.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Upper bound on a whole reservation, lock wait included.
pub const DEFAULT_RESERVATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for [`CachedInventoryService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventorySettings {
    /// Lifetime of a cached inventory snapshot.
    pub cache_ttl: Duration,

    /// Deadline for a whole reservation, lock wait included.
    pub reservation_timeout: Duration,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            reservation_timeout: DEFAULT_RESERVATION_TIMEOUT,
        }
    }
}

/// Inventory reads served through the cache, reservations against storage.
#[derive(Clone)]
pub struct CachedInventoryService {
    storage: Arc<dyn InventoryStorage>,
    cache: BestEffortCache,
    settings: InventorySettings,
}

impl CachedInventoryService {
    /// Serve inventory from `storage`, caching reads in `cache`.
    #[must_use]
    pub fn new(
        storage: Arc<dyn InventoryStorage>,
        cache: BestEffortCache,
        settings: InventorySettings,
    ) -> Self {
        Self {
            storage,
            cache,
            settings,
        }
    }

    /// Run `call` unless the reservation deadline passes first.
    async fn before_deadline<T, F>(deadline: Instant, call: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        timeout_at(deadline, call)
            .await
            .map_err(|_elapsed| StorageError::Conflict(ConflictReason::LockTimeout))?
    }

    async fn abandon(tx: Box<dyn InventoryTransaction>, product: ProductId) {
        if let Err(error) = tx.rollback().await {
            warn!(product_id = %product, %error, "rollback failed, transaction dropped");
        }
    }

    /// Commit, then drop every cache entry the reservation made stale.
    ///
    /// Runs as its own task, so it finishes even if the caller is dropped.
    async fn settle(
        &self,
        tx: Box<dyn InventoryTransaction>,
        product: ProductId,
    ) -> Result<(), InventoryServiceError> {
        let cache = self.cache.clone();

        let settled = tokio::spawn(
            async move {
                if let Err(error) = tx.commit().await {
                    error!(%error, "reservation commit failed");

                    return Err(error);
                }

                cache.delete(&inventory_key(product)).await;
                cache.delete_prefix(SEARCH_PREFIX).await;

                Ok(())
            }
            .instrument(Span::current()),
        )
        .await;

        match settled {
            Ok(result) => result.map_err(InventoryServiceError::from),
            Err(join_error) => {
                error!(%join_error, "reservation commit task failed");

                Err(InventoryServiceError::Unavailable(StorageError::Unavailable(
                    Box::new(join_error),
                )))
            }
        }
    }
}

impl Debug for CachedInventoryService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CachedInventoryService")
            .field("cache", &self.cache)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl InventoryService for CachedInventoryService {
    #[instrument(skip(self), fields(product_id = %product))]
    async fn get_inventory(&self, product: ProductId) -> Result<InventoryView, InventoryServiceError> {
        let key = inventory_key(product);

        if let Some(view) = self.cache.get_json::<InventoryView>(&key).await {
            debug!("inventory cache hit");

            return Ok(view);
        }

        let view = InventoryView::from(self.storage.get_inventory(product).await?);

        self.cache
            .set_json(&key, &view, self.settings.cache_ttl)
            .await;

        Ok(view)
    }

    #[instrument(skip(self), fields(product_id = %product))]
    async fn reserve_inventory(
        &self,
        product: ProductId,
        quantity: i64,
    ) -> Result<Reservation, InventoryServiceError> {
        let requested = u64::try_from(quantity)
            .ok()
            .filter(|requested| *requested > 0)
            .ok_or_else(|| {
                InventoryServiceError::InvalidInput(format!(
                    "quantity must be greater than zero, got {quantity}"
                ))
            })?;

        let deadline = Instant::now() + self.settings.reservation_timeout;

        let mut tx = Self::before_deadline(
            deadline,
            self.storage.begin(self.settings.reservation_timeout),
        )
        .await?;

        let locked = Self::before_deadline(deadline, tx.lock_for_update(product)).await;

        let locked = match locked {
            Ok(locked) => locked,
            Err(error) => {
                Self::abandon(tx, product).await;

                if error.is_retryable() {
                    warn!(%error, "could not lock inventory row");
                }

                return Err(error.into());
            }
        };

        let available = locked.quantity();

        if available < requested {
            Self::abandon(tx, product).await;

            warn!(requested, available, "insufficient stock");

            return Ok(Reservation::InsufficientStock {
                product_id: product,
                requested,
                available,
            });
        }

        let Some(updated) = tx.decrement(&locked, requested).await? else {
            Self::abandon(tx, product).await;

            warn!(requested, available, "stock changed under lock");

            return Ok(Reservation::InsufficientStock {
                product_id: product,
                requested,
                available,
            });
        };

        self.settle(tx, product).await?;

        info!(requested, remaining = updated.quantity, "inventory reserved");

        Ok(Reservation::Reserved {
            product_id: product,
            reserved: requested,
            remaining: updated.quantity,
        })
    }
}

/// Inventory operations offered to request adapters.
#[automock]
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Current stock of a product, served from the cache when possible.
    async fn get_inventory(&self, product: ProductId) -> Result<InventoryView, InventoryServiceError>;

    /// Atomically take `quantity` units of a product out of stock.
    ///
    /// Running short is reported as [`Reservation::InsufficientStock`], not as
    /// an error.
    async fn reserve_inventory(
        &self,
        product: ProductId,
        quantity: i64,
    ) -> Result<Reservation, InventoryServiceError>;
}
