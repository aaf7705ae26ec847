/// Tests for the admin token cache: caching, expiry, invalidation, and the
/// single-flight login guard. All admin endpoints are mocked.
use axum::http::StatusCode;
use inspection_customer_api::admin_auth::AdminTokenCache;
use inspection_customer_api::errors::AppError;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token_cache(base_url: String) -> AdminTokenCache {
    AdminTokenCache::new(
        base_url,
        "svc@example.com".to_string(),
        "secret".to_string(),
        Duration::from_millis(2000),
    )
    .unwrap()
}

fn login_response(token: &str, expires_in: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "data": {"token": token, "expiresIn": expires_in}
    }))
}

#[tokio::test]
async fn token_is_cached_and_reused() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(login_response("tok-1", 3600))
        .expect(1)
        .mount(&server)
        .await;

    let cache = token_cache(server.uri());

    let first = cache.token().await.unwrap();
    let second = cache.token().await.unwrap();

    assert_eq!(first, "tok-1");
    assert_eq!(second, "tok-1");
}

#[tokio::test]
async fn token_inside_safety_margin_triggers_relogin() {
    let server = MockServer::start().await;

    // expiresIn below the 60s safety margin leaves no usable lifetime, so
    // every call must log in again.
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(login_response("tok-short", 30))
        .expect(2)
        .mount(&server)
        .await;

    let cache = token_cache(server.uri());

    cache.token().await.unwrap();
    cache.token().await.unwrap();
}

#[tokio::test]
async fn login_failure_carries_upstream_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(login_response("tok-2", 3600))
        .mount(&server)
        .await;

    let cache = token_cache(server.uri());

    let err = cache.token().await.unwrap_err();
    assert!(
        matches!(err, AppError::Auth { status, .. } if status == StatusCode::UNAUTHORIZED)
    );

    // Failure cleared the cache; the next attempt re-authenticates.
    let token = cache.token().await.unwrap();
    assert_eq!(token, "tok-2");
}

#[tokio::test]
async fn unreachable_login_defaults_to_bad_gateway() {
    // Nothing listens on this port.
    let cache = token_cache("http://127.0.0.1:9".to_string());

    let err = cache.token().await.unwrap_err();
    assert!(matches!(err, AppError::Auth { status, .. } if status == StatusCode::BAD_GATEWAY));
}

#[tokio::test]
async fn missing_token_in_response_is_an_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {}})))
        .mount(&server)
        .await;

    let cache = token_cache(server.uri());

    let err = cache.token().await.unwrap_err();
    assert!(matches!(err, AppError::Auth { .. }));
    assert!(err.to_string().contains("No token received"));
}

#[tokio::test]
async fn invalidate_forces_relogin() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(login_response("tok-1", 3600))
        .expect(2)
        .mount(&server)
        .await;

    let cache = token_cache(server.uri());

    cache.token().await.unwrap();
    cache.invalidate().await;
    cache.token().await.unwrap();
}

#[tokio::test]
async fn concurrent_misses_share_one_login() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(login_response("tok-1", 3600).set_delay(Duration::from_millis(100)))
        .expect(1)
        .mount(&server)
        .await;

    let cache = Arc::new(token_cache(server.uri()));

    let mut handles = vec![];
    for _ in 0..10 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move { cache.token().await }));
    }

    for handle in handles {
        let token = handle.await.unwrap().unwrap();
        assert_eq!(token, "tok-1");
    }
}
