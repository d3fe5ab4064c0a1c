//! Application settings shared by the CLI and the servers.

use std::time::Duration;

use clap::{Args, ValueEnum};

use crate::domain::inventory::InventorySettings;

/// Database settings.
#[derive(Debug, Clone, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Maximum pooled connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    pub database_max_connections: u32,
}

/// Where cached reads are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackend {
    /// In-process map, lost on restart. Only coherent when a single server
    /// performs every reservation.
    Memory,

    /// Shared Redis server.
    Redis,

    /// Caching disabled.
    None,
}

impl CacheBackend {
    /// Whether entries live inside this process and nowhere else.
    #[must_use]
    pub fn is_process_local(self) -> bool {
        matches!(self, Self::Memory)
    }
}

/// Cache settings.
#[derive(Debug, Clone, Args)]
pub struct CacheConfig {
    /// Cache backend (memory, redis, none)
    #[arg(long, env = "CACHE_BACKEND", value_enum, default_value_t = CacheBackend::Memory)]
    pub cache_backend: CacheBackend,

    /// Redis connection string, required for the redis backend
    #[arg(long, env = "REDIS_URL", hide_env_values = true)]
    pub redis_url: Option<String>,

    /// Lifetime of cached entries in seconds
    #[arg(long, env = "CACHE_TTL_SECONDS", default_value_t = 300)]
    pub cache_ttl_seconds: u64,

    /// Upper bound on a single cache call in milliseconds
    #[arg(long, env = "CACHE_OP_TIMEOUT_MS", default_value_t = 250)]
    pub cache_op_timeout_ms: u64,
}

impl CacheConfig {
    /// Lifetime of cached entries.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Upper bound on a single cache call.
    #[must_use]
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_op_timeout_ms)
    }
}

/// Reservation settings.
#[derive(Debug, Clone, Args)]
pub struct InventoryConfig {
    /// Deadline for a whole reservation, lock wait included, in milliseconds
    #[arg(long, env = "LOCK_TIMEOUT_MS", default_value_t = 5_000)]
    pub lock_timeout_ms: u64,
}

impl InventoryConfig {
    /// Service settings for these options and the cache TTL.
    #[must_use]
    pub fn settings(&self, cache: &CacheConfig) -> InventorySettings {
        InventorySettings {
            cache_ttl: cache.ttl(),
            reservation_timeout: Duration::from_millis(self.lock_timeout_ms),
        }
    }
}

/// Everything needed to build an [`AppContext`](crate::context::AppContext).
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Cache settings.
    #[command(flatten)]
    pub cache: CacheConfig,

    /// Reservation settings.
    #[command(flatten)]
    pub inventory: InventoryConfig,
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        app: AppConfig,
    }

    #[test]
    fn defaults_apply_when_only_database_is_given() -> TestResult {
        let harness = Harness::try_parse_from(["test", "--database-url", "postgres://localhost/db"])?;

        assert_eq!(harness.app.cache.cache_backend, CacheBackend::Memory);
        assert_eq!(harness.app.cache.ttl(), Duration::from_secs(300));
        assert_eq!(
            harness.app.cache.operation_timeout(),
            Duration::from_millis(250)
        );
        assert_eq!(
            harness.app.inventory.settings(&harness.app.cache),
            InventorySettings::default()
        );

        Ok(())
    }

    #[test]
    fn cache_backend_parses_from_flag() -> TestResult {
        let harness = Harness::try_parse_from([
            "test",
            "--database-url",
            "postgres://localhost/db",
            "--cache-backend",
            "redis",
            "--redis-url",
            "redis://localhost",
        ])?;

        assert_eq!(harness.app.cache.cache_backend, CacheBackend::Redis);
        assert_eq!(harness.app.cache.redis_url.as_deref(), Some("redis://localhost"));

        Ok(())
    }

    #[test]
    fn only_memory_backend_is_process_local() {
        assert!(CacheBackend::Memory.is_process_local());
        assert!(!CacheBackend::Redis.is_process_local());
        assert!(!CacheBackend::None.is_process_local());
    }
}
