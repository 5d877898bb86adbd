//! Caching infrastructure for the service layer.
//!
//! [`CacheInterface`] is the raw backend (Redis in production) and
//! [`LikeCountCache`] is the boundary the like engine talks to, which turns
//! every backend failure into a miss or a no-op.

mod cache_interface;
pub mod cache_keys;
mod like_count_cache;
mod redis_cache;

pub use cache_interface::CacheInterface;
#[cfg(test)]
pub use cache_interface::MockCacheInterface;
pub use like_count_cache::LikeCountCache;
pub use redis_cache::RedisCacheService;
