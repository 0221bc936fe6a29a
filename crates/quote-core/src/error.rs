//! 주식 대시보드 서비스의 에러 타입.
//!
//! 이 모듈은 서비스 전반에서 사용되는 통합 에러 타입을 정의합니다.
//! "찾을 수 없음"을 `None`이나 빈 컬렉션으로 표현하지 않고
//! 항상 타입화된 에러로 표현합니다.

use thiserror::Error;

/// 핵심 서비스 에러.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// 심볼/지수/데이터를 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 잘못된 입력 (심볼 형식, 지수 이름, 파라미터 범위)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 업스트림 데이터 제공자 에러
    #[error("업스트림 에러: {0}")]
    Upstream(String),

    /// 업스트림 요청 한도 초과 (HTTP 429)
    #[error("요청 한도 초과: {0}")]
    RateLimited(String),

    /// 업스트림 응답 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 데이터베이스 에러
    #[error("데이터베이스 에러: {0}")]
    Database(String),

    /// 인증 에러
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),
}

/// 서비스 작업을 위한 Result 타입.
pub type QuoteResult<T> = Result<T, QuoteError>;

impl QuoteError {
    /// 재시도 가능한 에러인지 확인합니다.
    ///
    /// 네트워크성 실패와 요청 한도 초과만 재시도 대상입니다.
    /// `NotFound`와 `InvalidInput`은 재시도해도 결과가 바뀌지 않습니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, QuoteError::Upstream(_) | QuoteError::RateLimited(_))
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(err: serde_json::Error) -> Self {
        QuoteError::Parse(err.to_string())
    }
}
