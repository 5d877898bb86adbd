//! Application builder.

use axum::Router;
use plaudit_config::AppConfig;
use plaudit_core::{PlauditError, PlauditResult};
use plaudit_repository::{connect_repository, ArticleLikeRepository};
use plaudit_resilience::RateLimiter;
use plaudit_rest::{create_router, AppState};
use plaudit_service::{CachePolicy, LikeCountCache, LikeServiceImpl, RedisCacheService};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// How often idle rate limiter buckets are dropped.
const RATE_LIMIT_PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Application builder for constructing the server.
pub struct AppBuilder {
    config: Option<AppConfig>,
}

impl AppBuilder {
    /// Creates a new application builder.
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Connects the store and cache and assembles the like engine and router.
    pub async fn build(self) -> PlauditResult<Application> {
        let config = self.config.unwrap_or_default();

        let store = connect_repository(&config.database).await?;
        let cache_backend = RedisCacheService::from_config(&config.redis)?;
        let cache = LikeCountCache::new(Arc::new(cache_backend));
        let cache_enabled = cache.is_enabled();

        let like_service = Arc::new(LikeServiceImpl::new(
            store.clone(),
            cache,
            CachePolicy::from(&config.cache),
        ));
        let rate_limiter = RateLimiter::from_config(&config.rate_limit);

        let state = AppState::new(like_service, store.clone(), rate_limiter.clone());
        let router = create_router(state, &config.server);

        Ok(Application {
            router,
            store,
            rate_limiter,
            config,
            cache_enabled,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Assembled server, ready to accept connections.
pub struct Application {
    router: Router,
    store: Arc<dyn ArticleLikeRepository>,
    rate_limiter: RateLimiter,
    config: AppConfig,
    cache_enabled: bool,
}

impl Application {
    /// Returns the HTTP router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// Binds the configured server address.
    pub async fn bind(&self) -> PlauditResult<TcpListener> {
        let addr = self.config.server.addr();
        TcpListener::bind(&addr)
            .await
            .map_err(|e| PlauditError::Internal(format!("Failed to bind {}: {}", addr, e)))
    }

    /// Serves requests on `listener` until `shutdown` resolves, then drains
    /// in-flight requests and closes the store.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> PlauditResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let limiter = self.rate_limiter.clone();
        let purge = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(RATE_LIMIT_PURGE_INTERVAL);
            loop {
                ticker.tick().await;
                limiter.purge_idle();
                debug!(callers = limiter.tracked_callers(), "Purged idle rate limit buckets");
            }
        });

        if let Ok(addr) = listener.local_addr() {
            info!("Starting REST server on http://{}", addr);
        }

        let result = axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| PlauditError::Internal(format!("REST server error: {}", e)));

        purge.abort();
        self.store.close().await;
        result
    }
}
