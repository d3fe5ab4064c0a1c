//! Best-effort key/value cache used as a read-through accelerator.
//!
//! Backends implement [`CacheStore`] and report their failures. Services never
//! talk to a backend directly: they go through [`BestEffortCache`], which turns
//! every failure into a logged no-op so the cache can never change the outcome
//! of a storage-backed operation.

mod best_effort;
mod errors;
pub mod keys;
mod memory;
mod null;
mod redis_store;
mod store;

pub use best_effort::{BestEffortCache, DEFAULT_OPERATION_TIMEOUT};
pub use errors::CacheError;
pub use memory::{DEFAULT_EVICTION_INTERVAL, MemoryStore};
pub use null::NullStore;
pub use redis_store::RedisStore;
pub use store::*;
