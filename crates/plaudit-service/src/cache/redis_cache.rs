//! Redis-based cache implementation.

use super::CacheInterface;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool, PoolConfig, Runtime};
use plaudit_config::RedisConfig;
use plaudit_core::{PlauditError, PlauditResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// How long a request waits for a Redis connection before giving up.
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(2);

/// Compare-and-set for counters, run atomically by Redis.
///
/// `KEYS[1]` is the counter key, `ARGV[1]` the new value and `ARGV[2]` the TTL
/// in seconds (`0` for none). Returns 1 when the value was written.
const SET_IF_GREATER_SCRIPT: &str = r"
local current = tonumber(redis.call('GET', KEYS[1]))
local incoming = tonumber(ARGV[1])
if current ~= nil and current >= incoming then
  return 0
end
local ttl = tonumber(ARGV[2])
if ttl > 0 then
  redis.call('SET', KEYS[1], ARGV[1], 'EX', ttl)
else
  redis.call('SET', KEYS[1], ARGV[1])
end
return 1
";

fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs().max(1)
}

/// Redis-based cache service.
pub struct RedisCacheService {
    /// Redis connection pool; `None` when caching is disabled.
    pool: Option<Arc<Pool>>,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self { pool: None }
    }

    /// Builds the service from configuration.
    ///
    /// Creating the pool does not connect; an unreachable Redis shows up later
    /// as per-operation failures, which the like count cache absorbs.
    pub fn from_config(config: &RedisConfig) -> PlauditResult<Self> {
        if !config.enabled {
            info!("Redis cache disabled; like counts are served from the store");
            return Ok(Self::disabled());
        }

        let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
        let mut pool_cfg = PoolConfig::new(config.pool_size);
        pool_cfg.timeouts.wait = Some(CONNECTION_TIMEOUT);
        pool_cfg.timeouts.create = Some(CONNECTION_TIMEOUT);
        pool_cfg.timeouts.recycle = Some(CONNECTION_TIMEOUT);
        redis_cfg.pool = Some(pool_cfg);

        let pool = redis_cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|e| PlauditError::Configuration(format!("Failed to create Redis pool: {}", e)))?;

        info!("Redis cache pool created for {}", config.url);
        Ok(Self::new(Arc::new(pool)))
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> PlauditResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool
                .get()
                .await
                .map_err(|e| PlauditError::cache(format!("Failed to get Redis connection: {}", e))),
            None => Err(PlauditError::cache("Cache is disabled")),
        }
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> PlauditResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| PlauditError::cache(format!("Failed to get key '{}': {}", key, e)))?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set_raw_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> PlauditResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;

        let mut cmd = deadpool_redis::redis::cmd("SET");
        cmd.arg(key).arg(value).arg("NX");
        if let Some(ttl) = ttl {
            cmd.arg("EX").arg(ttl_secs(ttl));
        }
        let reply: Option<String> = cmd
            .query_async(&mut conn)
            .await
            .map_err(|e| PlauditError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        let written = reply.is_some();
        debug!("Populate of key '{}' with {:?} TTL: written={}", key, ttl, written);
        Ok(written)
    }

    async fn set_counter_if_greater(
        &self,
        key: &str,
        value: u64,
        ttl: Option<Duration>,
    ) -> PlauditResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;

        let written: i64 = deadpool_redis::redis::cmd("EVAL")
            .arg(SET_IF_GREATER_SCRIPT)
            .arg(1)
            .arg(key)
            .arg(value)
            .arg(ttl.map_or(0, ttl_secs))
            .query_async(&mut conn)
            .await
            .map_err(|e| PlauditError::cache(format!("Failed to set key '{}': {}", key, e)))?;

        debug!("Write-through of key '{}' = {}: written={}", key, value, written == 1);
        Ok(written == 1)
    }

    async fn delete(&self, key: &str) -> PlauditResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| PlauditError::cache(format!("Failed to delete key '{}': {}", key, e)))?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_cache() {
        let cache = RedisCacheService::disabled();
        assert!(!cache.is_enabled());
    }

    #[tokio::test]
    async fn test_disabled_cache_is_a_permanent_miss() {
        let cache = RedisCacheService::disabled();
        assert!(!cache.set_raw_if_absent("k", "1", None).await.unwrap());
        assert!(!cache.set_counter_if_greater("k", 1, None).await.unwrap());
        assert_eq!(cache.get_raw("k").await.unwrap(), None);
        assert!(!cache.delete("k").await.unwrap());
    }

    #[test]
    fn test_ttl_rounds_up_to_one_second() {
        assert_eq!(ttl_secs(Duration::from_millis(10)), 1);
        assert_eq!(ttl_secs(Duration::from_secs(300)), 300);
    }

    #[test]
    fn test_from_config_respects_enabled_flag() {
        let config = RedisConfig {
            enabled: false,
            ..RedisConfig::default()
        };
        assert!(!RedisCacheService::from_config(&config).unwrap().is_enabled());
    }

    #[tokio::test]
    async fn test_from_config_builds_lazy_pool() {
        let cache = RedisCacheService::from_config(&RedisConfig::default()).unwrap();
        assert!(cache.is_enabled());
    }
}
