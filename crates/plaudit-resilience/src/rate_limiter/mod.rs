//! Keyed rate limiter.

use governor::{
    clock::DefaultClock, middleware::NoOpMiddleware, state::keyed::DefaultKeyedStateStore, Quota,
    RateLimiter as GovernorRateLimiter,
};
use plaudit_config::RateLimitConfig;
use plaudit_core::PlauditError;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, warn};

type KeyedLimiter =
    GovernorRateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock, NoOpMiddleware>;

/// Rate limiter keyed by caller.
///
/// Each caller gets its own token bucket refilled at `requests_per_minute`
/// and holding at most `burst` tokens. A disabled limiter admits everything.
pub struct RateLimiter {
    limiter: Option<Arc<KeyedLimiter>>,
}

impl RateLimiter {
    /// Creates a limiter allowing `requests` per minute per caller, with the
    /// given burst size.
    pub fn per_minute(requests: u32, burst: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN))
            .allow_burst(NonZeroU32::new(burst).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: Some(Arc::new(GovernorRateLimiter::keyed(quota))),
        }
    }

    /// Creates a limiter that never rejects.
    pub fn disabled() -> Self {
        Self { limiter: None }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        if config.enabled {
            Self::per_minute(config.requests_per_minute, config.burst)
        } else {
            warn!("Rate limiting disabled");
            Self::disabled()
        }
    }

    /// Takes one token from `caller`'s bucket.
    pub fn check(&self, caller: &str) -> Result<(), PlauditError> {
        let Some(limiter) = &self.limiter else {
            return Ok(());
        };

        limiter.check_key(&caller.to_string()).map_err(|_| {
            debug!(caller = %caller, "Rate limit exceeded");
            PlauditError::RateLimitExceeded
        })
    }

    /// Drops buckets of callers that are back at full capacity.
    pub fn purge_idle(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.retain_recent();
            limiter.shrink_to_fit();
        }
    }

    /// Number of callers currently tracked.
    pub fn tracked_callers(&self) -> usize {
        self.limiter.as_ref().map_or(0, |limiter| limiter.len())
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            limiter: self.limiter.clone(),
        }
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_allows_burst() {
        let limiter = RateLimiter::per_minute(60, 3);
        for _ in 0..3 {
            assert!(limiter.check("u1").is_ok());
        }
        assert!(matches!(
            limiter.check("u1"),
            Err(PlauditError::RateLimitExceeded)
        ));
    }

    #[test]
    fn test_rate_limiter_is_per_caller() {
        let limiter = RateLimiter::per_minute(60, 1);
        assert!(limiter.check("u1").is_ok());
        assert!(limiter.check("u1").is_err());
        assert!(limiter.check("u2").is_ok());
        assert_eq!(limiter.tracked_callers(), 2);
    }

    #[test]
    fn test_clones_share_buckets() {
        let limiter = RateLimiter::per_minute(60, 1);
        let clone = limiter.clone();
        assert!(limiter.check("u1").is_ok());
        assert!(clone.check("u1").is_err());
    }

    #[test]
    fn test_disabled_limiter_admits_everything() {
        let limiter = RateLimiter::from_config(&RateLimitConfig {
            enabled: false,
            ..RateLimitConfig::default()
        });
        for _ in 0..1000 {
            assert!(limiter.check("u1").is_ok());
        }
        assert_eq!(limiter.tracked_callers(), 0);
    }

    #[test]
    fn test_zero_quota_is_clamped() {
        let limiter = RateLimiter::per_minute(0, 0);
        assert!(limiter.check("u1").is_ok());
        assert!(limiter.check("u1").is_err());
    }
}
