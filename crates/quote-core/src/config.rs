//! 설정 관리.
//!
//! 애플리케이션 설정을 정의하고 환경 변수에서 로드합니다.

use serde::{Deserialize, Serialize};

/// 환경 변수를 파싱하고, 없거나 형식이 잘못되면 기본값을 사용합니다.
fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// 불리언 환경 변수 ("true" 또는 "1").
fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

/// 애플리케이션 설정.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 데이터 관리 설정
    pub data: DataConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 환경 변수에서 전체 설정을 로드합니다.
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            data: DataConfig::from_env(),
            logging: LoggingConfig::from_env(),
        }
    }
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// # 환경변수
    /// - `API_HOST`: 바인딩 호스트 (기본값: 127.0.0.1)
    /// - `API_PORT`: 바인딩 포트 (기본값: 8000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: env_parse("API_PORT", defaults.port),
        }
    }

    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 데이터베이스 설정.
///
/// `DATABASE_URL`이 없으면 서버는 기동하되 인증 엔드포인트가
/// 비활성화된 상태로 동작합니다.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// 연결 문자열 (`DATABASE_URL`)
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            acquire_timeout_secs: 10,
        }
    }
}

impl DatabaseConfig {
    /// 환경 변수에서 설정 로드.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("DATABASE_URL").ok(),
            max_connections: env_parse("DATABASE_MAX_CONNECTIONS", defaults.max_connections),
            acquire_timeout_secs: env_parse(
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout_secs,
            ),
        }
    }
}

/// 인증 설정.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT 서명 비밀 키
    pub jwt_secret: String,
    /// 액세스 토큰 만료 시간 (분)
    pub access_token_expire_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "dev-secret-key-change-in-production".to_string(),
            access_token_expire_minutes: 30,
        }
    }
}

impl AuthConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// # 환경변수
    /// - `JWT_SECRET`: 서명 비밀 키 (미설정 시 개발용 기본값 + 경고)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using default (INSECURE for development only)");
            defaults.jwt_secret.clone()
        });

        Self {
            jwt_secret,
            access_token_expire_minutes: defaults.access_token_expire_minutes,
        }
    }
}

/// 데이터 관리 설정.
///
/// 캐시 TTL, 배치 동시성, 재시도 정책 파라미터를 포함합니다.
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// 실제 업스트림 제공자 사용 여부 (`USE_LIVE_QUOTES`)
    pub use_live_quotes: bool,
    /// 단일 시세 캐시 TTL (초)
    pub quote_ttl_secs: u64,
    /// 기본 캐시 TTL (초)
    pub default_ttl_secs: u64,
    /// 배치 결과 캐시 TTL (초)
    pub batch_ttl_secs: u64,
    /// 캐시 최대 엔트리 수
    pub cache_capacity: usize,
    /// 동시 업스트림 요청 한도
    pub max_concurrent_fetches: usize,
    /// 재시도 최대 횟수
    pub retry_max_attempts: u32,
    /// 재시도 기본 대기 시간 (밀리초)
    pub retry_base_delay_ms: u64,
    /// 재시도 최대 대기 시간 (밀리초)
    pub retry_max_delay_ms: u64,
    /// 재시도 전체 데드라인 (초)
    pub retry_deadline_secs: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            use_live_quotes: false,
            quote_ttl_secs: 600,
            default_ttl_secs: 300,
            batch_ttl_secs: 180,
            cache_capacity: 1024,
            max_concurrent_fetches: 5,
            retry_max_attempts: 5,
            retry_base_delay_ms: 500,
            retry_max_delay_ms: 10_000,
            retry_deadline_secs: 30,
        }
    }
}

impl DataConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// # 환경변수
    /// - `USE_LIVE_QUOTES`: "true"면 실제 업스트림 연결 (기본값: false)
    /// - `QUOTE_CACHE_TTL_SECS`, `DEFAULT_CACHE_TTL_SECS`,
    ///   `BATCH_CACHE_TTL_SECS`: 캐시 TTL
    /// - `CACHE_CAPACITY`: 캐시 최대 엔트리 수
    /// - `MAX_CONCURRENT_FETCHES`: 배치 동시성 한도
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            use_live_quotes: env_flag("USE_LIVE_QUOTES"),
            quote_ttl_secs: env_parse("QUOTE_CACHE_TTL_SECS", defaults.quote_ttl_secs),
            default_ttl_secs: env_parse("DEFAULT_CACHE_TTL_SECS", defaults.default_ttl_secs),
            batch_ttl_secs: env_parse("BATCH_CACHE_TTL_SECS", defaults.batch_ttl_secs),
            cache_capacity: env_parse("CACHE_CAPACITY", defaults.cache_capacity),
            max_concurrent_fetches: env_parse(
                "MAX_CONCURRENT_FETCHES",
                defaults.max_concurrent_fetches,
            ),
            retry_max_attempts: env_parse("RETRY_MAX_ATTEMPTS", defaults.retry_max_attempts),
            retry_base_delay_ms: env_parse("RETRY_BASE_DELAY_MS", defaults.retry_base_delay_ms),
            retry_max_delay_ms: env_parse("RETRY_MAX_DELAY_MS", defaults.retry_max_delay_ms),
            retry_deadline_secs: env_parse("RETRY_DEADLINE_SECS", defaults.retry_deadline_secs),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    /// 환경 변수에서 설정 로드.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or(defaults.level),
            format: std::env::var("LOG_FORMAT").unwrap_or(defaults.format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DataConfig::default();
        assert_eq!(config.quote_ttl_secs, 600);
        assert_eq!(config.default_ttl_secs, 300);
        assert_eq!(config.batch_ttl_secs, 180);
        assert_eq!(config.max_concurrent_fetches, 5);
        assert!(!config.use_live_quotes);

        let auth = AuthConfig::default();
        assert_eq!(auth.access_token_expire_minutes, 30);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::default();
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.port(), 8000);

        let bad = ServerConfig {
            host: "not a host".to_string(),
            port: 8000,
        };
        assert!(bad.socket_addr().is_err());
    }
}
