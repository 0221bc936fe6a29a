//! JWT 토큰 처리.
//!
//! 액세스 토큰 생성/검증 로직. 토큰은 상태를 갖지 않으며 서명과
//! 만료 시간만으로 유효성이 결정됩니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

/// JWT 액세스 토큰 페이로드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 이름
    pub sub: String,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// 새로운 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `username` - 사용자 이름
    /// * `expires_in_minutes` - 만료 시간 (분)
    pub fn new(username: impl Into<String>, expires_in_minutes: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: username.into(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(expires_in_minutes)).timestamp(),
        }
    }
}

/// JWT 토큰 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("토큰 디코딩 실패")]
    DecodingError,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("잘못된 토큰 형식")]
    InvalidToken,
}

/// 액세스 토큰 생성.
///
/// # Arguments
///
/// * `claims` - JWT 페이로드
/// * `secret` - 서명 비밀 키
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(JwtError::from)
}

/// JWT 토큰 디코딩 및 검증.
///
/// 만료 시간은 유예(leeway) 없이 엄격하게 검증합니다.
pub fn decode_token(token: &str, secret: &str) -> Result<TokenData<Claims>, JwtError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidToken => JwtError::InvalidToken,
        _ => JwtError::DecodingError,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    #[test]
    fn test_create_and_decode_token() {
        let claims = Claims::new("testuser", 30);

        let token = create_token(&claims, TEST_SECRET).unwrap();
        assert!(!token.is_empty());

        let decoded = decode_token(&token, TEST_SECRET).unwrap();
        assert_eq!(decoded.claims.sub, "testuser");
        assert_eq!(decoded.claims.exp - decoded.claims.iat, 30 * 60);
    }

    #[test]
    fn test_token_valid_before_expiry() {
        // T 시점 발급, 29분 남은 토큰은 유효
        let now = Utc::now();
        let claims = Claims {
            sub: "testuser".to_string(),
            iat: (now - Duration::minutes(1)).timestamp(),
            exp: (now + Duration::minutes(29)).timestamp(),
        };

        let token = create_token(&claims, TEST_SECRET).unwrap();
        assert!(decode_token(&token, TEST_SECRET).is_ok());
    }

    #[test]
    fn test_token_rejected_after_expiry() {
        // 만료 1분 지난 토큰 (T+31분 시점의 30분 토큰)은 거부
        let now = Utc::now();
        let claims = Claims {
            sub: "testuser".to_string(),
            iat: (now - Duration::minutes(31)).timestamp(),
            exp: (now - Duration::minutes(1)).timestamp(),
        };

        let token = create_token(&claims, TEST_SECRET).unwrap();
        let result = decode_token(&token, TEST_SECRET);
        assert!(matches!(result, Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_invalid_token() {
        let result = decode_token("invalid.token.here", TEST_SECRET);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let claims = Claims::new("testuser", 30);
        let token = create_token(&claims, TEST_SECRET).unwrap();

        let result = decode_token(&token, "wrong-secret-key-for-testing-minimum-32-chars");
        assert!(result.is_err());
    }
}
