//! Cache backend trait.

use async_trait::async_trait;
use plaudit_core::PlauditResult;
use std::time::Duration;

/// Raw key/value cache backend.
///
/// Backends report their failures; callers that must not fail because of the
/// cache go through [`crate::cache::LikeCountCache`], which absorbs them.
///
/// There is no unconditional write. Entries are only ever created in an empty
/// slot or moved to a larger counter value, so concurrent writers cannot
/// leave an older value behind a newer one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheInterface: Send + Sync {
    /// Get a raw value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> PlauditResult<Option<String>>;

    /// Stores `value` only if `key` holds nothing.
    ///
    /// Returns `true` if the value was written.
    async fn set_raw_if_absent(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> PlauditResult<bool>;

    /// Stores the counter `value` unless `key` already holds a number that is
    /// greater or equal. A non-numeric entry is replaced.
    ///
    /// With `ttl = None` the entry lives until it is replaced. Returns `true`
    /// if the value was written.
    async fn set_counter_if_greater(
        &self,
        key: &str,
        value: u64,
        ttl: Option<Duration>,
    ) -> PlauditResult<bool>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> PlauditResult<bool>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}
