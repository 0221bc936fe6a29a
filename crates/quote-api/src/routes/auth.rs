//! 인증 라우트.
//!
//! # 엔드포인트
//!
//! - `POST /auth/register` - 회원가입
//! - `POST /auth/login` - 로그인 (bearer 토큰 발급)
//! - `GET /auth/me` - 현재 사용자 조회

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::auth::{AuthService, JwtAuth, LoginData};
use crate::error::{ApiError, ApiResult};
use crate::repository::User;
use crate::response::ApiResponse;
use crate::state::AppState;

/// 회원가입 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// 사용자 이름 (유니크)
    pub username: String,
    /// 이메일 (선택, 유니크)
    pub email: Option<String>,
    /// 비밀번호 (평문, 저장 전 해싱)
    pub password: String,
}

/// 로그인 요청.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// 사용자 이름
    pub username: String,
    /// 비밀번호
    pub password: String,
}

/// 회원가입.
///
/// POST /auth/register
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "생성된 사용자", body = User),
        (status = 400, description = "중복 사용자 이름/이메일 또는 약한 비밀번호"),
        (status = 503, description = "데이터베이스 미설정")
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let pool = state
        .db_pool
        .as_ref()
        .ok_or_else(ApiError::database_unavailable)?;

    let user = AuthService::create_user(
        pool,
        &body.username,
        body.email.as_deref(),
        &body.password,
    )
    .await?;

    info!(username = %user.username, "New user registered");

    Ok(Json(ApiResponse::with_message(
        user,
        "User registered successfully",
    )))
}

/// 로그인.
///
/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "bearer 토큰과 사용자 요약", body = LoginData),
        (status = 401, description = "잘못된 자격 증명"),
        (status = 503, description = "데이터베이스 미설정")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<ApiResponse<LoginData>>> {
    let pool = state
        .db_pool
        .as_ref()
        .ok_or_else(ApiError::database_unavailable)?;

    let data = AuthService::login_user(pool, &state.auth, &body.username, &body.password).await?;

    Ok(Json(ApiResponse::with_message(data, "Login successful")))
}

/// 현재 로그인한 사용자 정보 조회.
///
/// GET /auth/me
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_token" = [])),
    responses(
        (status = 200, description = "현재 사용자", body = User),
        (status = 401, description = "토큰 없음/만료/무효"),
        (status = 503, description = "데이터베이스 미설정")
    )
)]
pub async fn me(
    State(state): State<Arc<AppState>>,
    JwtAuth(claims): JwtAuth,
) -> ApiResult<Json<ApiResponse<User>>> {
    let pool = state
        .db_pool
        .as_ref()
        .ok_or_else(ApiError::database_unavailable)?;

    let user = AuthService::get_user_by_username(pool, &claims.sub)
        .await?
        .ok_or_else(|| ApiError::unauthorized("사용자를 찾을 수 없습니다"))?;

    Ok(Json(ApiResponse::ok(user)))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_fixture_state;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        auth_router().with_state(create_fixture_state())
    }

    #[tokio::test]
    async fn test_register_without_database_is_503() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/register")
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

    #[tokio::test]
    async fn test_me_without_token_is_401_with_challenge() {
        let response = app()
            .oneshot(Request::builder().uri("/me").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn test_me_with_garbage_token_is_401() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/me")
                    .header(header::AUTHORIZATION, "Bearer not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
