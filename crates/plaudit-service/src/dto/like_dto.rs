//! Like-related DTOs.

use serde::{Deserialize, Serialize};

/// Like count of an article, as returned to HTTP callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeCountResponse {
    pub likes: u64,
}

impl From<u64> for LikeCountResponse {
    fn from(likes: u64) -> Self {
        Self { likes }
    }
}

/// Result of recording a like.
///
/// `already_liked` is a normal outcome, not an error: the count is still the
/// current authoritative value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLikeOutcome {
    pub likes: u64,
    pub already_liked: bool,
}

impl AddLikeOutcome {
    /// The like was recorded and the count now reads `likes`.
    #[must_use]
    pub fn liked(likes: u64) -> Self {
        Self {
            likes,
            already_liked: false,
        }
    }

    /// The user had already liked the article; nothing changed.
    #[must_use]
    pub fn already_liked(likes: u64) -> Self {
        Self {
            likes,
            already_liked: true,
        }
    }
}

impl From<AddLikeOutcome> for LikeCountResponse {
    fn from(outcome: AddLikeOutcome) -> Self {
        Self {
            likes: outcome.likes,
        }
    }
}
