//! Failure-absorbing like count cache.

use super::{cache_keys, CacheInterface};
use plaudit_core::ArticleId;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Best-effort mirror of like counts.
///
/// This is where cache failures stop. A failed or unparsable read is a miss
/// and a failed write is dropped, so the like engine stays correct (only
/// slower) with the cache fully down.
#[derive(Clone)]
pub struct LikeCountCache {
    backend: Arc<dyn CacheInterface>,
}

impl LikeCountCache {
    /// Wraps a cache backend.
    #[must_use]
    pub fn new(backend: Arc<dyn CacheInterface>) -> Self {
        Self { backend }
    }

    /// Returns the cached count, or `None` if it is not cached.
    ///
    /// `None` means "ask the store", never "zero likes". An unparsable entry
    /// is evicted so the next read can repopulate the slot.
    pub async fn get(&self, article_id: &ArticleId) -> Option<u64> {
        let key = cache_keys::like_count(article_id);

        match self.backend.get_raw(&key).await {
            Ok(Some(raw)) => match raw.trim().parse::<u64>() {
                Ok(count) => Some(count),
                Err(_) => {
                    warn!(key = %key, value = %raw, "Evicting unparsable cached like count");
                    if let Err(e) = self.backend.delete(&key).await {
                        warn!(key = %key, error = %e, "Cache eviction failed");
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed; falling back to the store");
                None
            }
        }
    }

    /// Fills an empty slot with a count read from the store.
    ///
    /// An existing entry always wins: it was written by a like at least as
    /// recent as this read.
    pub async fn populate(&self, article_id: &ArticleId, count: u64, ttl: Option<Duration>) {
        let key = cache_keys::like_count(article_id);

        match self.backend.set_raw_if_absent(&key, &count.to_string(), ttl).await {
            Ok(true) => debug!(key = %key, count, ?ttl, "Cached like count"),
            Ok(false) => debug!(key = %key, count, "Slot already filled; populate skipped"),
            Err(e) => warn!(key = %key, error = %e, "Cache write failed; entry skipped"),
        }
    }

    /// Stores the count produced by a like.
    ///
    /// Counts never go down, so a smaller value than the cached one is
    /// dropped. Failures are logged and dropped.
    pub async fn set(&self, article_id: &ArticleId, count: u64, ttl: Option<Duration>) {
        let key = cache_keys::like_count(article_id);

        match self.backend.set_counter_if_greater(&key, count, ttl).await {
            Ok(true) => debug!(key = %key, count, ?ttl, "Cached like count"),
            Ok(false) => debug!(key = %key, count, "Newer count already cached"),
            Err(e) => warn!(key = %key, error = %e, "Cache write failed; entry skipped"),
        }
    }

    /// Returns `true` if a real backend is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.backend.is_enabled()
    }
}

impl std::fmt::Debug for LikeCountCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LikeCountCache")
            .field("enabled", &self.backend.is_enabled())
            .finish()
    }
}
