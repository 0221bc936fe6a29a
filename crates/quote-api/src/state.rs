//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! `AppState`는 Arc로 래핑되어 Axum의 State extractor를 통해
//! 핸들러에 주입됩니다.

use std::sync::Arc;

use quote_core::AuthConfig;
use quote_data::StockService;

/// 애플리케이션 공유 상태.
pub struct AppState {
    /// 주식 데이터 서비스 (제공자 + 캐시 + 재시도 정책)
    pub stock_service: StockService,

    /// 데이터베이스 연결 풀 (PostgreSQL)
    ///
    /// `DATABASE_URL` 미설정 시 None이며, 인증 엔드포인트는 503을
    /// 반환합니다.
    pub db_pool: Option<sqlx::PgPool>,

    /// 인증 설정 (JWT 비밀 키, 토큰 만료 시간)
    pub auth: AuthConfig,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl AppState {
    /// 새로운 AppState 생성.
    pub fn new(stock_service: StockService, auth: AuthConfig) -> Self {
        Self {
            stock_service,
            db_pool: None,
            auth,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// DB 연결 풀을 설정합니다.
    #[must_use]
    pub fn with_db_pool(mut self, pool: sqlx::PgPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// 서버 업타임(초)을 반환합니다.
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }

    /// 데이터베이스 연결 상태 확인.
    pub async fn is_db_healthy(&self) -> bool {
        match &self.db_pool {
            Some(pool) => sqlx::query("SELECT 1").fetch_one(pool).await.is_ok(),
            None => false,
        }
    }
}

/// 픽스처 제공자 기반 테스트용 상태 생성.
pub fn create_fixture_state() -> Arc<AppState> {
    use quote_core::DataConfig;
    use quote_data::{FixtureProvider, QuoteCache};

    let config = DataConfig::default();
    let service = StockService::new(
        Arc::new(FixtureProvider::new()),
        Arc::new(QuoteCache::new(config.cache_capacity)),
        &config,
    );

    Arc::new(AppState::new(service, AuthConfig::default()))
}
