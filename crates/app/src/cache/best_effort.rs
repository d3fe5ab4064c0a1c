//! Failure-absorbing cache decorator.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    future::Future,
    sync::Arc,
    time::Duration,
};

use serde::{Serialize, de::DeserializeOwned};
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::cache::{CacheError, CacheStore, NullStore};

/// Upper bound on a single cache round trip.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_millis(250);

/// Wraps a [`CacheStore`] so that no cache failure ever reaches the caller.
///
/// Every call is bounded by a timeout. Backend errors, timeouts and
/// undecodable values are logged at `warn` and reported as "the cache had no
/// effect": reads become misses, writes and deletes become no-ops.
#[derive(Clone)]
pub struct BestEffortCache {
    store: Arc<dyn CacheStore>,
    operation_timeout: Duration,
}

impl BestEffortCache {
    /// Wrap `store`, giving up on any call after `operation_timeout`.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, operation_timeout: Duration) -> Self {
        Self {
            store,
            operation_timeout,
        }
    }

    /// A cache that never holds anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Arc::new(NullStore), DEFAULT_OPERATION_TIMEOUT)
    }

    /// Read and decode a cached value. Any failure reads as a miss.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = self.attempt("get", key, self.store.get(key)).await??;

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(source) => {
                warn!(key, error = %CacheError::from(source), "discarding undecodable cache entry");

                None
            }
        }
    }

    /// Encode and store a value for `ttl`. Failures are logged and dropped.
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Duration) {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(source) => {
                warn!(key, error = %CacheError::from(source), "could not encode cache entry");

                return;
            }
        };

        self.attempt("set", key, self.store.set(key, bytes, ttl))
            .await;
    }

    /// Remove a single entry. Failures are logged and dropped.
    pub async fn delete(&self, key: &str) {
        self.attempt("delete", key, self.store.delete(key)).await;
    }

    /// Remove every entry under `prefix`. Failures are logged and dropped.
    pub async fn delete_prefix(&self, prefix: &str) {
        if let Some(removed) = self
            .attempt("delete_prefix", prefix, self.store.delete_prefix(prefix))
            .await
        {
            debug!(prefix, removed, "invalidated cache entries by prefix");
        }
    }

    async fn attempt<T, F>(&self, operation: &'static str, key: &str, call: F) -> Option<T>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        let error = match timeout(self.operation_timeout, call).await {
            Ok(Ok(value)) => return Some(value),
            Ok(Err(error)) => error,
            Err(_elapsed) => CacheError::Timeout(self.operation_timeout),
        };

        warn!(operation, key, %error, "cache operation failed, continuing without cache");

        None
    }
}

impl Debug for BestEffortCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("BestEffortCache")
            .field("operation_timeout", &self.operation_timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::future::pending;

    use serde::Deserialize;
    use testresult::TestResult;

    use crate::cache::{MemoryStore, MockCacheStore};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Snapshot {
        quantity: u64,
    }

    fn failing_store() -> MockCacheStore {
        let mut store = MockCacheStore::new();

        store
            .expect_get()
            .returning(|_| Err(CacheError::Unavailable("connection refused".to_string())));
        store
            .expect_set()
            .returning(|_, _, _| Err(CacheError::Unavailable("connection refused".to_string())));
        store
            .expect_delete()
            .returning(|_| Err(CacheError::Unavailable("connection refused".to_string())));
        store
            .expect_delete_prefix()
            .returning(|_| Err(CacheError::Unavailable("connection refused".to_string())));

        store
    }

    #[tokio::test]
    async fn round_trips_json_values() {
        let cache = BestEffortCache::new(Arc::new(MemoryStore::new()), DEFAULT_OPERATION_TIMEOUT);

        cache
            .set_json("inventory:1", &Snapshot { quantity: 3 }, Duration::from_secs(60))
            .await;

        assert_eq!(
            cache.get_json::<Snapshot>("inventory:1").await,
            Some(Snapshot { quantity: 3 })
        );
    }

    #[tokio::test]
    async fn backend_failures_read_as_misses_and_no_ops() {
        let cache = BestEffortCache::new(Arc::new(failing_store()), DEFAULT_OPERATION_TIMEOUT);

        assert_eq!(cache.get_json::<Snapshot>("inventory:1").await, None);

        cache
            .set_json("inventory:1", &Snapshot { quantity: 3 }, Duration::from_secs(60))
            .await;
        cache.delete("inventory:1").await;
        cache.delete_prefix("search:").await;
    }

    #[tokio::test]
    async fn undecodable_values_read_as_misses() -> TestResult {
        let store = Arc::new(MemoryStore::new());

        store
            .set("inventory:1", b"not json".to_vec(), Duration::from_secs(60))
            .await?;

        let cache = BestEffortCache::new(store, DEFAULT_OPERATION_TIMEOUT);

        assert_eq!(cache.get_json::<Snapshot>("inventory:1").await, None);

        Ok(())
    }

    #[derive(Debug)]
    struct HangingStore;

    #[async_trait::async_trait]
    impl CacheStore for HangingStore {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            pending().await
        }

        async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
            pending().await
        }

        async fn delete(&self, _key: &str) -> Result<(), CacheError> {
            pending().await
        }

        async fn delete_prefix(&self, _prefix: &str) -> Result<u64, CacheError> {
            pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hung_backend_is_abandoned_after_timeout() {
        let cache = BestEffortCache::new(Arc::new(HangingStore), Duration::from_millis(10));

        assert_eq!(cache.get_json::<Snapshot>("inventory:1").await, None);

        cache.delete("inventory:1").await;
        cache.delete_prefix("search:").await;
    }
}
