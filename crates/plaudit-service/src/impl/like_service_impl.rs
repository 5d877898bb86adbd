//! Like service implementation.

use crate::cache::LikeCountCache;
use crate::dto::AddLikeOutcome;
use crate::like_service::LikeService;
use async_trait::async_trait;
use plaudit_config::CacheConfig;
use plaudit_core::{ArticleId, PlauditError, PlauditResult, UserId};
use plaudit_repository::{ArticleLikeRepository, CreateOutcome, IncrementOutcome};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Expiry applied to cached counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Entries populated on a read miss.
    pub read_ttl: Duration,
    /// Entries written through after a like; `None` never expires.
    pub write_ttl: Option<Duration>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for CachePolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            read_ttl: config.read_ttl(),
            write_ttl: config.write_ttl(),
        }
    }
}

/// Like engine over a durable store and a best-effort count cache.
pub struct LikeServiceImpl {
    repository: Arc<dyn ArticleLikeRepository>,
    cache: LikeCountCache,
    policy: CachePolicy,
}

impl LikeServiceImpl {
    /// Creates a new like service.
    pub fn new(
        repository: Arc<dyn ArticleLikeRepository>,
        cache: LikeCountCache,
        policy: CachePolicy,
    ) -> Self {
        Self {
            repository,
            cache,
            policy,
        }
    }

    async fn write_through(&self, article_id: &ArticleId, count: u64) {
        self.cache.set(article_id, count, self.policy.write_ttl).await;
    }

    /// Adds the like to an existing record, resolving a concurrent duplicate
    /// into an already-liked outcome.
    async fn increment(
        &self,
        article_id: &ArticleId,
        user_id: &UserId,
    ) -> PlauditResult<AddLikeOutcome> {
        match self.repository.conditional_increment(article_id, user_id).await? {
            IncrementOutcome::Incremented(record) => {
                info!(
                    article_id = %article_id,
                    user_id = %user_id,
                    likes = record.like_count,
                    "Like recorded"
                );
                self.write_through(article_id, record.like_count).await;
                Ok(AddLikeOutcome::liked(record.like_count))
            }
            IncrementOutcome::AlreadyMember => {
                debug!(
                    article_id = %article_id,
                    user_id = %user_id,
                    "Concurrent duplicate like; reading back current count"
                );
                let record = self.repository.fetch(article_id).await?.ok_or_else(|| {
                    PlauditError::internal(format!(
                        "Like record for '{}' vanished after a duplicate like",
                        article_id
                    ))
                })?;
                Ok(AddLikeOutcome::already_liked(record.like_count))
            }
        }
    }
}

#[async_trait]
impl LikeService for LikeServiceImpl {
    async fn get_likes(&self, article_id: &ArticleId) -> PlauditResult<u64> {
        if let Some(count) = self.cache.get(article_id).await {
            debug!(article_id = %article_id, likes = count, "Like count served from cache");
            return Ok(count);
        }

        let count = self
            .repository
            .fetch(article_id)
            .await?
            .map_or(0, |record| record.like_count);

        debug!(article_id = %article_id, likes = count, "Like count loaded from store");
        self.cache
            .populate(article_id, count, Some(self.policy.read_ttl))
            .await;

        Ok(count)
    }

    async fn add_like(
        &self,
        article_id: &ArticleId,
        user_id: &UserId,
    ) -> PlauditResult<AddLikeOutcome> {
        debug!(article_id = %article_id, user_id = %user_id, "Adding like");

        match self.repository.fetch(article_id).await? {
            None => match self.repository.create_if_absent(article_id, user_id).await? {
                CreateOutcome::Created(record) => {
                    info!(
                        article_id = %article_id,
                        user_id = %user_id,
                        "First like recorded"
                    );
                    self.write_through(article_id, record.like_count).await;
                    Ok(AddLikeOutcome::liked(record.like_count))
                }
                CreateOutcome::AlreadyExists => {
                    debug!(
                        article_id = %article_id,
                        "Record created concurrently; adding like to it"
                    );
                    self.increment(article_id, user_id).await
                }
            },
            Some(record) if record.has_liked(user_id) => {
                debug!(article_id = %article_id, user_id = %user_id, "Already liked");
                Ok(AddLikeOutcome::already_liked(record.like_count))
            }
            Some(_) => self.increment(article_id, user_id).await,
        }
    }
}
