//! # Plaudit REST
//!
//! HTTP surface of Plaudit using Axum: the article like endpoints, caller
//! identity extraction, per-client rate limiting and health checks.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
