//! Request outcome logging.

use super::caller_key;
use crate::responses::ErrorCode;
use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

/// Logs one line per routed request: the route template rather than the raw
/// path, the client bucket and, for failures, the error code sent back.
///
/// Installed with `route_layer`, so only requests that matched a route reach
/// it; everything else is covered by the `TraceLayer` span.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path().to_string(), |path| path.as_str().to_string());
    let client = caller_key(&request);
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = start.elapsed().as_millis();
    match response.extensions().get::<ErrorCode>() {
        Some(ErrorCode(code)) if response.status().is_server_error() => warn!(
            target: "http",
            method = %method,
            route = %route,
            client = %client,
            status,
            code,
            elapsed_ms,
            "Request failed"
        ),
        Some(ErrorCode(code)) => info!(
            target: "http",
            method = %method,
            route = %route,
            client = %client,
            status,
            code,
            elapsed_ms,
            "Request rejected"
        ),
        None => info!(
            target: "http",
            method = %method,
            route = %route,
            client = %client,
            status,
            elapsed_ms,
            "Request completed"
        ),
    }

    response
}
