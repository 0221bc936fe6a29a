//! 전체 라우터 통합 테스트.
//!
//! 픽스처 제공자로 상태를 구성하고, 라우터 조합(중첩 경로, envelope,
//! 상태 코드)을 실제 HTTP 요청 흐름으로 검증합니다.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use quote_api::routes::create_api_router;
use quote_api::state::create_fixture_state;
use tower::ServiceExt;

fn app() -> Router {
    create_api_router().with_state(create_fixture_state())
}

async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_endpoint_responds() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn stock_info_is_wrapped_in_envelope() {
    let (status, json) = get_json("/stocks/AAPL/info").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["symbol"], "AAPL");
    assert!(json["data"]["currentPrice"].is_number());
    assert!(json["data"]["changePercent"].is_number());
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn unknown_symbol_returns_error_envelope() {
    let (status, json) = get_json("/stocks/ZZZZZ/info").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "NOT_FOUND");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn search_always_returns_suggestions() {
    let (status, json) = get_json("/stocks/search?query=zzz-no-such-company").await;

    assert_eq!(status, StatusCode::OK);
    let suggestions = json["data"]["suggestions"].as_array().unwrap();
    assert!(!suggestions.is_empty());
}

#[tokio::test]
async fn invalid_index_name_is_rejected() {
    let (status, json) = get_json("/stocks/index/kosdaq/stocks").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = json["error"]["message"].as_str().unwrap();
    assert!(message.contains("dow"));
    assert!(message.contains("russell2000"));
}

#[tokio::test]
async fn compare_preserves_request_order() {
    let (status, json) = get_json("/stocks/compare?symbols=MSFT,AAPL").await;

    assert_eq!(status, StatusCode::OK);
    let data = json["data"].as_array().unwrap();
    assert_eq!(data[0]["symbol"], "MSFT");
    assert_eq!(data[1]["symbol"], "AAPL");
}

#[tokio::test]
async fn me_without_token_receives_bearer_challenge() {
    let response = app()
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );
}

#[tokio::test]
async fn register_without_database_is_unavailable() {
    let response = app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"username": "tester", "password": "abcd1234"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
