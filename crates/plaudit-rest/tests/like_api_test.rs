//! Router-level tests for the like endpoints.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use plaudit_config::ServerConfig;
use plaudit_repository::MemoryArticleLikeRepository;
use plaudit_resilience::RateLimiter;
use plaudit_rest::{create_router, AppState};
use plaudit_service::{CachePolicy, LikeCountCache, LikeServiceImpl, RedisCacheService};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    store: Arc<MemoryArticleLikeRepository>,
}

fn app_with_limiter(rate_limiter: RateLimiter) -> TestApp {
    let store = Arc::new(MemoryArticleLikeRepository::new());
    let like_service = Arc::new(LikeServiceImpl::new(
        store.clone(),
        LikeCountCache::new(Arc::new(RedisCacheService::disabled())),
        CachePolicy::default(),
    ));
    let state = AppState::new(like_service, store.clone(), rate_limiter);

    TestApp {
        router: create_router(state, &ServerConfig::default()),
        store,
    }
}

fn app() -> TestApp {
    app_with_limiter(RateLimiter::disabled())
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get_likes(article: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/api/v1/articles/{}/likes", article))
        .body(Body::empty())
        .unwrap()
}

fn post_like(article: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(format!("/api/v1/articles/{}/likes", article));
    if let Some(user) = user {
        builder = builder.header("user-id", user);
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_like_flow_over_http() {
    let app = app();

    assert_eq!(
        send(&app.router, get_likes("art1")).await,
        (StatusCode::OK, json!({"likes": 0}))
    );
    assert_eq!(
        send(&app.router, post_like("art1", Some("u1"))).await,
        (StatusCode::OK, json!({"likes": 1}))
    );

    let (status, body) = send(&app.router, post_like("art1", Some("u1"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ALREADY_LIKED");

    assert_eq!(
        send(&app.router, post_like("art1", Some("u2"))).await,
        (StatusCode::OK, json!({"likes": 2}))
    );
    assert_eq!(
        send(&app.router, get_likes("art1")).await,
        (StatusCode::OK, json!({"likes": 2}))
    );
}

#[tokio::test]
async fn test_like_without_caller_is_rejected() {
    let app = app();

    let (status, body) = send(&app.router, post_like("art1", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTHENTICATION_REQUIRED");

    let (status, _) = send(&app.router, post_like("art1", Some("   "))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.store.record_count(), 0);
}

#[tokio::test]
async fn test_ids_with_surrounding_whitespace_are_rejected() {
    let app = app();
    send(&app.router, post_like("art1", Some("u1"))).await;

    let (status, body) = send(&app.router, get_likes("%20art1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = send(&app.router, post_like("art1", Some(" u1"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    assert_eq!(
        send(&app.router, get_likes("art1")).await,
        (StatusCode::OK, json!({"likes": 1}))
    );
}

#[tokio::test]
async fn test_oversized_article_id_is_rejected() {
    let app = app();
    let article = "a".repeat(256);

    let (status, body) = send(&app.router, get_likes(&article)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(&app.router, post_like(&article, Some("u1"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.record_count(), 0);
}

fn from_peer(mut request: Request<Body>, peer: [u8; 4]) -> Request<Body> {
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from((peer, 40000))));
    request
}

#[tokio::test]
async fn test_rate_limit_is_per_client_address() {
    let app = app_with_limiter(RateLimiter::per_minute(60, 2));
    let client = [10, 0, 0, 7];

    for user in ["u1", "u2"] {
        let request = from_peer(post_like("art1", Some(user)), client);
        let (status, _) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    let request = from_peer(post_like("art1", Some("u3")), client);
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "RATE_LIMIT_EXCEEDED");

    let request = from_peer(post_like("art1", Some("u3")), [10, 0, 0, 8]);
    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_changing_user_header_does_not_reset_the_limit() {
    let app = app_with_limiter(RateLimiter::per_minute(60, 1));
    let client = [10, 0, 0, 7];

    let mut admitted = 0;
    for i in 0..20 {
        let request = get_likes("art1");
        let mut request = from_peer(request, client);
        request
            .headers_mut()
            .insert("user-id", format!("user{}", i).parse().unwrap());
        let (status, _) = send(&app.router, request).await;
        if status == StatusCode::OK {
            admitted += 1;
        } else {
            assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        }
    }

    assert_eq!(admitted, 1);
}

#[tokio::test]
async fn test_health_endpoints_skip_rate_limit() {
    let app = app_with_limiter(RateLimiter::per_minute(60, 1));

    for _ in 0..3 {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }
}

#[tokio::test]
async fn test_store_outage() {
    let app = app();
    app.store.set_available(false);

    let (status, body) = send(&app.router, get_likes("art1")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"code": "STORE_UNAVAILABLE", "message": "Failed to access like counts"})
    );

    let (status, _) = send(&app.router, post_like("art1", Some("u1"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unavailable");
}

#[tokio::test]
async fn test_health_checks_when_healthy() {
    let app = app();

    let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");

    let request = Request::builder().uri("/live").body(Body::empty()).unwrap();
    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
}
