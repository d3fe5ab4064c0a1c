//! In-process cache backend.

use std::{
    sync::{Arc, Weak},
    time::{Duration, Instant},
};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::{task::JoinHandle, time::interval};
use tracing::debug;

use crate::cache::{CacheError, CacheStore};

type Entries = DashMap<String, (Vec<u8>, Instant, Duration)>;

/// How often [`MemoryStore::spawn_eviction`] sweeps by default.
pub const DEFAULT_EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Cache backend backed by a `DashMap`.
///
/// Each entry stores `(value, inserted_at, ttl)`. Expired entries are evicted
/// when read, and by the periodic sweep for keys nobody reads again.
///
/// The map lives inside one process. Writers in any other process (the CLI, a
/// second server) cannot invalidate it, so it is only coherent when a single
/// server performs every reservation.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Entries>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a live entry exists for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner
            .get(key)
            .is_some_and(|entry| is_live(entry.value()))
    }

    /// Remove all expired entries.
    pub fn evict_expired(&self) {
        self.inner.retain(|_, entry| is_live(entry));
    }

    /// Remove `key` only while it is still expired, so a concurrent `set` wins.
    fn evict_if_expired(&self, key: &str) {
        self.inner.remove_if(key, |_, entry| !is_live(entry));
    }

    /// Sweep expired entries every `every` until the store is dropped.
    pub fn spawn_eviction(&self, every: Duration) -> JoinHandle<()> {
        let entries: Weak<Entries> = Arc::downgrade(&self.inner);

        tokio::spawn(async move {
            let mut ticks = interval(every);

            loop {
                ticks.tick().await;

                let Some(entries) = entries.upgrade() else {
                    break;
                };

                let before = entries.len();
                entries.retain(|_, entry| is_live(entry));

                debug!(
                    evicted = before.saturating_sub(entries.len()),
                    "swept expired cache entries"
                );
            }
        })
    }
}

fn is_live((_, inserted, ttl): &(Vec<u8>, Instant, Duration)) -> bool {
    inserted.elapsed() < *ttl
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        if let Some(entry) = self.inner.get(key) {
            if is_live(entry.value()) {
                return Ok(Some(entry.value().0.clone()));
            }
        }

        self.evict_if_expired(key);

        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        self.inner
            .insert(key.to_string(), (value, Instant::now(), ttl));

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner.remove(key);

        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let before = self.inner.len();

        self.inner.retain(|key, _| !key.starts_with(prefix));

        Ok(u64::try_from(before.saturating_sub(self.inner.len())).unwrap_or(u64::MAX))
    }
}
