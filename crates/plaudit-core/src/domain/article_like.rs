//! Authoritative per-article like record.

use crate::{ArticleId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Durable like state of one article.
///
/// `like_count` always equals the size of `liked_by`; membership is the
/// idempotency key that keeps a user from liking the same article twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleLikeRecord {
    pub article_id: ArticleId,
    pub like_count: u64,
    pub liked_by: BTreeSet<UserId>,
    pub last_updated: DateTime<Utc>,
}

impl ArticleLikeRecord {
    /// Creates the record for an article's first like.
    #[must_use]
    pub fn first_like(article_id: ArticleId, user_id: UserId, at: DateTime<Utc>) -> Self {
        Self {
            article_id,
            like_count: 1,
            liked_by: BTreeSet::from([user_id]),
            last_updated: at,
        }
    }

    /// Returns `true` if the user already liked this article.
    #[must_use]
    pub fn has_liked(&self, user_id: &UserId) -> bool {
        self.liked_by.contains(user_id)
    }

    /// Returns the record with one more like from `user_id`, or `None` if the
    /// user is already a member.
    #[must_use]
    pub fn with_like(&self, user_id: &UserId, at: DateTime<Utc>) -> Option<Self> {
        if self.has_liked(user_id) {
            return None;
        }

        let mut next = self.clone();
        next.liked_by.insert(user_id.clone());
        next.like_count += 1;
        next.last_updated = at;
        Some(next)
    }

    /// Checks the count/membership invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        usize::try_from(self.like_count).is_ok_and(|count| count == self.liked_by.len())
    }
}
