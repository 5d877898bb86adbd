//! Application state for Axum handlers.

use plaudit_repository::ArticleLikeRepository;
use plaudit_resilience::RateLimiter;
use plaudit_service::LikeService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub like_service: Arc<dyn LikeService>,
    /// Durable store, used by the readiness check.
    pub store: Arc<dyn ArticleLikeRepository>,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        like_service: Arc<dyn LikeService>,
        store: Arc<dyn ArticleLikeRepository>,
        rate_limiter: RateLimiter,
    ) -> Self {
        Self {
            like_service,
            store,
            rate_limiter,
        }
    }
}
