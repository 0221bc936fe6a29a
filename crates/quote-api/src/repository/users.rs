//! 사용자 저장소.
//!
//! 서비스가 영속화하는 유일한 상태는 사용자 테이블입니다.
//! 마이그레이션 프레임워크 없이 기동 시 `CREATE TABLE IF NOT EXISTS`로
//! 스키마를 보장합니다.

use chrono::{DateTime, Utc};
use quote_core::{QuoteError, QuoteResult};
use serde::Serialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

/// 사용자 레코드.
///
/// 비밀번호 해시는 직렬화에서 제외됩니다.
#[derive(Debug, Clone, Serialize, ToSchema, sqlx::FromRow)]
pub struct User {
    /// 사용자 ID
    pub id: Uuid,
    /// 사용자 이름 (유니크)
    pub username: String,
    /// 이메일 (유니크, 선택)
    pub email: Option<String>,
    /// 비밀번호 해시 (PHC 형식)
    #[serde(skip_serializing)]
    pub hashed_password: String,
    /// 생성 시간
    pub created_at: DateTime<Utc>,
}

/// 사용자 저장소.
pub struct UserRepository;

impl UserRepository {
    /// 사용자 테이블이 없으면 생성합니다.
    pub async fn ensure_schema(pool: &PgPool) -> QuoteResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                username TEXT NOT NULL UNIQUE,
                email TEXT UNIQUE,
                hashed_password TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )
            "#,
        )
        .execute(pool)
        .await
        .map_err(|e| QuoteError::Database(e.to_string()))?;

        Ok(())
    }

    /// 사용자 이름으로 조회.
    pub async fn find_by_username(pool: &PgPool, username: &str) -> QuoteResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, hashed_password, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(|e| QuoteError::Database(e.to_string()))
    }

    /// 이메일로 조회.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> QuoteResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, hashed_password, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .map_err(|e| QuoteError::Database(e.to_string()))
    }

    /// 새 사용자 생성.
    ///
    /// 유니크 제약 위반(중복 검사 후의 경합 포함)은
    /// `QuoteError::InvalidInput`으로 보고되어 같은 사용자 이름이
    /// 두 행을 만들 수 없습니다.
    pub async fn create(
        pool: &PgPool,
        username: &str,
        email: Option<&str>,
        hashed_password: &str,
    ) -> QuoteResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, hashed_password)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, hashed_password, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(hashed_password)
        .fetch_one(pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                QuoteError::InvalidInput("이미 등록된 사용자 이름 또는 이메일입니다".to_string())
            }
            _ => QuoteError::Database(e.to_string()),
        })
    }
}
