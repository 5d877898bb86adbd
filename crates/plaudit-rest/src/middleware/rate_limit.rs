//! Per-client rate limiting middleware.

use crate::responses::AppError;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use plaudit_resilience::RateLimiter;
use std::net::SocketAddr;

/// Rejects the request with `429` once its client has used up its quota.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = caller_key(&request);

    match limiter.check(&key) {
        Ok(()) => next.run(request).await,
        Err(e) => AppError(e).into_response(),
    }
}

/// Rate limit bucket for a request: the peer address of the connection.
///
/// The `user-id` header is chosen by the client, so it never selects the
/// bucket. Requests without connection info share one bucket.
pub fn caller_key(request: &Request<Body>) -> String {
    match request.extensions().get::<ConnectInfo<SocketAddr>>() {
        Some(ConnectInfo(addr)) => format!("ip:{}", addr.ip()),
        None => "ip:unknown".to_string(),
    }
}
