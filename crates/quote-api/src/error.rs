//! 통합 API 에러 응답 타입.
//!
//! 모든 엔드포인트는 실패 시
//! `{success: false, error: {code, message}, timestamp}` 형식을
//! 반환합니다. `QuoteError` → HTTP 상태 코드 매핑도 이 모듈 한 곳에
//! 있습니다.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use quote_core::QuoteError;
use serde::Serialize;
use utoipa::ToSchema;

/// 에러 상세 (envelope의 `error` 필드).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiErrorBody {
    /// 에러 코드 (예: "NOT_FOUND", "VALIDATION_ERROR")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
}

/// API 에러 응답.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP 상태 코드
    pub status: StatusCode,
    /// 에러 상세
    pub body: ApiErrorBody,
}

impl ApiError {
    /// 새 에러 생성.
    pub fn new(
        status: StatusCode,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    /// 401 인증 에러.
    ///
    /// 응답에 `WWW-Authenticate: Bearer` 챌린지가 포함됩니다.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    /// 503 데이터베이스 미설정 에러.
    pub fn database_unavailable() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "DATABASE_UNAVAILABLE",
            "데이터베이스가 설정되지 않았습니다",
        )
    }
}

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        let (status, code) = match &err {
            QuoteError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            QuoteError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            QuoteError::RateLimited(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_RATE_LIMITED"),
            QuoteError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            QuoteError::Parse(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PARSE_ERROR"),
            QuoteError::Database(_) => (StatusCode::SERVICE_UNAVAILABLE, "DB_ERROR"),
            QuoteError::Auth(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            QuoteError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
        };

        Self::new(status, code, err.to_string())
    }
}

/// 에러 envelope 직렬화 형식.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    /// 성공 여부 (항상 false)
    pub success: bool,
    /// 에러 상세
    pub error: ApiErrorBody,
    /// 에러 발생 시간 (RFC 3339)
    pub timestamp: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope = ErrorEnvelope {
            success: false,
            error: self.body,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let mut response = (self.status, Json(envelope)).into_response();
        if self.status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                header::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_error_mapping() {
        let cases = [
            (QuoteError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (QuoteError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (QuoteError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
            (QuoteError::RateLimited("x".into()), StatusCode::BAD_GATEWAY),
            (QuoteError::Database("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (QuoteError::Auth("x".into()), StatusCode::UNAUTHORIZED),
        ];

        for (err, expected) in cases {
            let api_err: ApiError = err.into();
            assert_eq!(api_err.status, expected);
        }
    }

    #[test]
    fn test_unauthorized_includes_challenge() {
        let response = ApiError::unauthorized("토큰이 필요합니다").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[test]
    fn test_error_envelope_shape() {
        let err = ApiError::new(StatusCode::NOT_FOUND, "NOT_FOUND", "없음");
        let envelope = ErrorEnvelope {
            success: false,
            error: err.body,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "없음");
    }
}
