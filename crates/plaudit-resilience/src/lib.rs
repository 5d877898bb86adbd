//! # Plaudit Resilience
//!
//! Protection for the like endpoints. Currently a per-client rate limiter.

pub mod rate_limiter;

pub use rate_limiter::*;
