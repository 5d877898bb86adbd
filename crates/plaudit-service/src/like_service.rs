//! Like service trait definition.

use crate::dto::AddLikeOutcome;
use async_trait::async_trait;
use plaudit_core::{ArticleId, PlauditResult, UserId};

/// Like engine.
///
/// Counts are authoritative in the durable store; the cache only ever holds a
/// copy of a value the store has confirmed.
#[async_trait]
pub trait LikeService: Send + Sync {
    /// Returns the current like count of an article, `0` if it has never been
    /// liked.
    async fn get_likes(&self, article_id: &ArticleId) -> PlauditResult<u64>;

    /// Records a like from `user_id`, at most once per user and article.
    async fn add_like(&self, article_id: &ArticleId, user_id: &UserId)
        -> PlauditResult<AddLikeOutcome>;
}
