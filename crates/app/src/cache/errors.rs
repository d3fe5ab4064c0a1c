//! Cache errors.

use std::time::Duration;

use thiserror::Error;

/// Failures reported by a [`CacheStore`](super::CacheStore) backend.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The Redis client reported an error.
    #[error("cache backend error")]
    Backend(#[from] redis::RedisError),

    /// The backend could not be reached.
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    /// The call did not finish in time.
    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),

    /// A value could not be encoded or decoded.
    #[error("cached value could not be encoded or decoded")]
    Serialization(#[from] serde_json::Error),
}
