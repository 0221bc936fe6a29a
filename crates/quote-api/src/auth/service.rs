//! 인증 서비스.
//!
//! 회원가입, 자격 증명 검증, 로그인 토큰 발급, 사용자 조회를
//! 담당합니다.

use axum::http::StatusCode;
use quote_core::AuthConfig;
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use super::jwt::{create_token, Claims};
use super::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{ApiError, ApiResult};
use crate::repository::{User, UserRepository};

/// 사용자 요약 (로그인 응답용).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserSummary {
    /// 사용자 ID
    pub id: Uuid,
    /// 사용자 이름
    pub username: String,
    /// 이메일
    pub email: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// 로그인 응답 데이터.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginData {
    /// 액세스 토큰 (JWT)
    pub access_token: String,
    /// 토큰 타입 (항상 "bearer")
    pub token_type: String,
    /// 사용자 요약
    pub user: UserSummary,
}

/// 인증 서비스.
pub struct AuthService;

impl AuthService {
    /// 새 사용자 생성.
    ///
    /// 중복 사용자 이름/이메일은 클라이언트 에러(400)로 거부되며,
    /// 같은 사용자 이름이 두 행을 만들 수 없습니다.
    pub async fn create_user(
        pool: &PgPool,
        username: &str,
        email: Option<&str>,
        password: &str,
    ) -> ApiResult<User> {
        if username.trim().is_empty() {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                "사용자 이름은 비어 있을 수 없습니다",
            ));
        }

        validate_password_strength(password)
            .map_err(|msg| ApiError::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg))?;

        // 사용자 이름 중복 확인
        if UserRepository::find_by_username(pool, username)
            .await?
            .is_some()
        {
            return Err(ApiError::new(
                StatusCode::BAD_REQUEST,
                "USERNAME_TAKEN",
                "이미 등록된 사용자 이름입니다",
            ));
        }

        // 이메일 중복 확인 (이메일이 제공된 경우)
        if let Some(email) = email {
            if UserRepository::find_by_email(pool, email).await?.is_some() {
                return Err(ApiError::new(
                    StatusCode::BAD_REQUEST,
                    "EMAIL_TAKEN",
                    "이미 등록된 이메일입니다",
                ));
            }
        }

        let hashed = hash_password(password).map_err(|_| {
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "HASHING_ERROR",
                "비밀번호 처리에 실패했습니다",
            )
        })?;

        let user = UserRepository::create(pool, username, email, &hashed).await?;
        Ok(user)
    }

    /// 자격 증명 검증.
    ///
    /// 사용자가 없거나 비밀번호가 틀리면 동일하게 `None`을 반환하므로
    /// 호출자는 두 경우를 구분할 수 없습니다.
    pub async fn authenticate_user(
        pool: &PgPool,
        username: &str,
        password: &str,
    ) -> ApiResult<Option<User>> {
        let user = match UserRepository::find_by_username(pool, username).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        if verify_password(password, &user.hashed_password).is_err() {
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// 로그인.
    ///
    /// 인증 성공 시 고정 만료 시간의 서명 토큰을 발급합니다.
    pub async fn login_user(
        pool: &PgPool,
        auth: &AuthConfig,
        username: &str,
        password: &str,
    ) -> ApiResult<LoginData> {
        let user = Self::authenticate_user(pool, username, password)
            .await?
            .ok_or_else(|| {
                ApiError::new(
                    StatusCode::UNAUTHORIZED,
                    "INVALID_CREDENTIALS",
                    "사용자 이름 또는 비밀번호가 올바르지 않습니다",
                )
            })?;

        let claims = Claims::new(&user.username, auth.access_token_expire_minutes);
        let access_token = create_token(&claims, &auth.jwt_secret).map_err(|_| {
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "TOKEN_ERROR",
                "토큰 발급에 실패했습니다",
            )
        })?;

        Ok(LoginData {
            access_token,
            token_type: "bearer".to_string(),
            user: UserSummary::from(&user),
        })
    }

    /// 사용자 이름으로 사용자 조회.
    pub async fn get_user_by_username(pool: &PgPool, username: &str) -> ApiResult<Option<User>> {
        Ok(UserRepository::find_by_username(pool, username).await?)
    }
}
