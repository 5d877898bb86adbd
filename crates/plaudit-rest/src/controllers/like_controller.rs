//! Article like controller.

use crate::{
    extractors::Caller,
    responses::{ok, ApiResult},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use plaudit_core::{ArticleId, PlauditError};
use plaudit_service::LikeCountResponse;
use tracing::debug;

/// Creates the article like router.
pub fn router() -> Router<AppState> {
    Router::new().route("/:article_id/likes", get(get_likes).post(add_like))
}

/// Get the like count of an article.
async fn get_likes(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
) -> ApiResult<LikeCountResponse> {
    let article_id = ArticleId::parse(&article_id)?;
    debug!("Get likes request: {}", article_id);

    let likes = state.like_service.get_likes(&article_id).await?;
    ok(LikeCountResponse::from(likes))
}

/// Like an article as the calling user.
///
/// A repeated like is reported as `400 ALREADY_LIKED`.
async fn add_like(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
    caller: Caller,
) -> ApiResult<LikeCountResponse> {
    let article_id = ArticleId::parse(&article_id)?;
    debug!("Add like request: {} by {}", article_id, *caller);

    let outcome = state.like_service.add_like(&article_id, &caller).await?;

    if outcome.already_liked {
        return Err(PlauditError::AlreadyLiked {
            article_id: article_id.to_string(),
        }
        .into());
    }

    ok(LikeCountResponse::from(outcome))
}
