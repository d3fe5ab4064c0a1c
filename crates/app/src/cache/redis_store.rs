//! Redis cache backend.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    time::Duration,
};

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager, cmd};

use crate::cache::{CacheError, CacheStore};

/// Keys fetched per `SCAN` round trip during prefix deletion.
const SCAN_BATCH: usize = 500;

/// Cache backend talking to Redis through a reconnecting connection manager.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    /// Connect to the Redis server at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is invalid or the first connection fails.
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;

        Ok(Self { connection })
    }
}

impl Debug for RedisStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RedisStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut connection = self.connection.clone();

        Ok(connection.get(key).await?)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();

        connection
            .set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
            .await?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();

        connection.del::<_, ()>(key).await?;

        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<u64, CacheError> {
        let mut connection = self.connection.clone();
        let pattern = format!("{}*", escape_glob(prefix));
        let mut cursor = 0_u64;
        let mut removed = 0_u64;

        // Never KEYS.
        loop {
            let (next, keys): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut connection)
                .await?;

            if !keys.is_empty() {
                removed += connection.del::<_, u64>(&keys).await?;
            }

            if next == 0 {
                return Ok(removed);
            }

            cursor = next;
        }
    }
}

/// Escape glob metacharacters so the prefix is matched literally.
fn escape_glob(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());

    for ch in prefix.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }

        escaped.push(ch);
    }

    escaped
}
