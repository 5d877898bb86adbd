//! Repository trait definitions.

use async_trait::async_trait;
use plaudit_core::{ArticleId, ArticleLikeRecord, PlauditResult, UserId};

/// Result of [`ArticleLikeRepository::create_if_absent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// This caller created the record with its first like.
    Created(ArticleLikeRecord),
    /// A concurrent caller created the record first; nothing was written.
    AlreadyExists,
}

/// Result of [`ArticleLikeRepository::conditional_increment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncrementOutcome {
    /// The user was added and the count went up by one.
    Incremented(ArticleLikeRecord),
    /// The user was already a member; nothing was written.
    AlreadyMember,
}

/// Durable store of article like records.
///
/// Implementations own every write to the authoritative record and must make
/// each mutation a single atomic store operation. Failures to reach the store
/// surface as [`plaudit_core::PlauditError::StoreUnavailable`] and are never
/// retried here.
#[async_trait]
pub trait ArticleLikeRepository: Send + Sync {
    /// Fetches the record for an article. No side effects.
    async fn fetch(&self, article_id: &ArticleId) -> PlauditResult<Option<ArticleLikeRecord>>;

    /// Creates the record with `first_user` as its only member.
    ///
    /// Exactly one of several racing callers gets [`CreateOutcome::Created`].
    async fn create_if_absent(
        &self,
        article_id: &ArticleId,
        first_user: &UserId,
    ) -> PlauditResult<CreateOutcome>;

    /// Adds `user_id` to the membership set and increments the count, unless
    /// the user is already a member.
    ///
    /// Returns [`plaudit_core::PlauditError::NotFound`] if the article has no
    /// record.
    async fn conditional_increment(
        &self,
        article_id: &ArticleId,
        user_id: &UserId,
    ) -> PlauditResult<IncrementOutcome>;

    /// Checks that the store is reachable.
    async fn health_check(&self) -> PlauditResult<()>;

    /// Releases store connections after the server has drained.
    async fn close(&self) {}
}
