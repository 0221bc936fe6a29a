//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (liveness)
//! - `/health/ready` - 상세 헬스 체크 (readiness)
//! - `/auth` - 회원가입, 로그인, 현재 사용자 조회
//! - `/stocks` - 검색, 시세, 차트, 재무, 배당, 비교, 랭킹

pub mod auth;
pub mod health;
pub mod stocks;

pub use auth::{auth_router, LoginRequest, RegisterRequest};
pub use health::{health_router, ComponentHealth, ComponentStatus, HealthResponse};
pub use stocks::{stocks_router, SearchData};

use axum::{routing::get, Json, Router};
use std::sync::Arc;

use crate::state::AppState;

/// 루트 엔드포인트.
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Stock Dashboard API is running" }))
}

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .nest("/health", health_router())
        .nest("/auth", auth_router())
        .nest("/stocks", stocks_router())
}
