//! 주식 대시보드 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 시세/차트/재무/검색 엔드포인트와 회원가입/로그인 인증 플로우를
//! 제공합니다.

use std::sync::Arc;
use std::time::Duration;

use axum::{Extension, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use quote_api::auth::JwtConfig;
use quote_api::openapi::swagger_ui_router;
use quote_api::repository::UserRepository;
use quote_api::routes::create_api_router;
use quote_api::state::AppState;
use quote_core::{init_logging, AppConfig, DataConfig};
use quote_data::{FixtureProvider, QuoteCache, QuoteProvider, StockService, YahooProvider};

/// 시장 데이터 제공자 선택.
///
/// `USE_LIVE_QUOTES=true`면 Yahoo Finance 제공자를 사용하고,
/// 그렇지 않거나 생성에 실패하면 픽스처 제공자로 대체합니다.
fn create_provider(config: &DataConfig) -> Arc<dyn QuoteProvider> {
    if config.use_live_quotes {
        match YahooProvider::new() {
            Ok(provider) => {
                info!("Yahoo Finance data provider initialized");
                return Arc::new(provider);
            }
            Err(e) => {
                error!(error = %e, "실시세 제공자 생성 실패, 픽스처 데이터로 대체");
            }
        }
    } else {
        warn!("USE_LIVE_QUOTES not set, using fixture data provider");
    }

    Arc::new(FixtureProvider::new())
}

/// CORS 미들웨어 구성.
///
/// `CORS_ORIGINS` 환경변수가 설정되어 있으면 해당 origin만 허용합니다.
/// 설정되지 않으면 개발 모드로 간주하여 모든 origin을 허용합니다.
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => {
            warn!("CORS_ORIGINS not set, allowing any origin (development mode)");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600))
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, jwt_secret: String) -> Router {
    create_api_router()
        .with_state(state)
        // OpenAPI 문서 및 Swagger UI
        .merge(swagger_ui_router())
        // JWT 추출기용 비밀 키
        .layer(Extension(JwtConfig { secret: jwt_secret }))
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초)
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors_layer())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // 설정 로드 및 tracing 초기화
    let config = AppConfig::from_env();
    init_logging(&config.logging)?;

    info!("Starting Stock Dashboard API server...");

    let addr = config.server.socket_addr().map_err(|e| {
        error!(
            host = %config.server.host,
            port = config.server.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. API_HOST, API_PORT 환경변수를 확인하세요."
        );
        e
    })?;

    // 데이터 서비스 구성 (제공자 + 캐시)
    let provider = create_provider(&config.data);
    let cache = Arc::new(QuoteCache::new(config.data.cache_capacity));
    let stock_service = StockService::new(provider, cache, &config.data);

    let mut state = AppState::new(stock_service, config.auth.clone());

    // DB 연결 설정 (DATABASE_URL 환경변수에서)
    if let Some(database_url) = &config.database.url {
        match PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_secs))
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                // 연결 테스트
                if sqlx::query("SELECT 1").fetch_one(&pool).await.is_ok() {
                    info!("Connected to PostgreSQL successfully");

                    // 사용자 테이블 생성 (없는 경우)
                    if let Err(e) = UserRepository::ensure_schema(&pool).await {
                        error!(error = %e, "사용자 테이블 생성 실패");
                    }

                    state = state.with_db_pool(pool);
                } else {
                    error!("Failed to verify database connection");
                }
            }
            Err(e) => {
                error!("Failed to connect to database: {}", e);
            }
        }
    } else {
        warn!("DATABASE_URL not set, auth endpoints will be disabled");
    }

    let state = Arc::new(state);

    info!(
        version = %state.version,
        has_db = state.db_pool.is_some(),
        provider = state.stock_service.provider_name(),
        "Application state initialized"
    );

    // 라우터 생성
    let app = create_router(state, config.auth.jwt_secret.clone());

    // 서버 시작
    info!(%addr, "API server listening");
    info!("Swagger UI available at http://{}/swagger-ui", addr);
    info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
