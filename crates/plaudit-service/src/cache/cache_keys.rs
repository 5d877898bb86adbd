//! Cache key generators for consistent key naming.

use plaudit_core::ArticleId;

/// Prefix for all cache keys to namespace them.
const CACHE_PREFIX: &str = "plaudit";

/// Generate the cache key holding an article's like count.
#[must_use]
pub fn like_count(article_id: &ArticleId) -> String {
    format!("{}:likes:{}", CACHE_PREFIX, article_id)
}
