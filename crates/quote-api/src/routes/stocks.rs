//! 주식 데이터 라우트.
//!
//! # 엔드포인트
//!
//! - `GET /stocks/search` - 티커/회사명 검색 (한글 지원)
//! - `GET /stocks/popular` - 인기 종목 목록
//! - `GET /stocks/compare` - 2~5개 종목 비교
//! - `GET /stocks/top-market-cap` - 시가총액 상위 10개
//! - `GET /stocks/index/{index_name}/stocks` - 지수별 상위 10개
//! - `GET /stocks/{symbol}/info` - 시세 스냅샷
//! - `GET /stocks/{symbol}/chart` - OHLCV 시계열
//! - `GET /stocks/{symbol}/financial` - 재무 요약
//! - `GET /stocks/{symbol}/dividends` - 배당 이력
//! - `GET /stocks/{symbol}/description` - 회사 프로필 (이중 언어)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use quote_core::{ChartInterval, ChartPeriod, ChartType, TickerSymbol};
use quote_data::{
    ChartSeries, CompanyProfile, DividendPayment, FinancialSummary, MarketCapEntry, StockInfo,
    StockSuggestion,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::state::AppState;

/// 검색 쿼리.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// 검색어 (티커 또는 회사명, 한글 가능)
    pub query: String,
    /// 최대 결과 수 (기본 10)
    #[serde(default = "default_search_limit")]
    pub limit: usize,
}

fn default_search_limit() -> usize {
    10
}

/// 검색 응답 데이터.
#[derive(Debug, Serialize, ToSchema)]
pub struct SearchData {
    /// 검색 제안 목록
    pub suggestions: Vec<StockSuggestion>,
}

/// 차트 쿼리.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ChartQuery {
    /// 차트 기간 (기본 1mo)
    #[serde(default)]
    pub period: ChartPeriod,
    /// 차트 간격 (기본 1d)
    #[serde(default)]
    pub interval: ChartInterval,
    /// 차트 타입 (표시용, 기본 line)
    #[serde(default)]
    pub chart_type: ChartType,
}

/// 배당 이력 쿼리.
#[derive(Debug, Deserialize, IntoParams)]
pub struct DividendQuery {
    /// 조회 연수 (1~10, 기본 5)
    #[serde(default = "default_dividend_years")]
    pub years: u32,
}

fn default_dividend_years() -> u32 {
    5
}

/// 비교 쿼리.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CompareQuery {
    /// 쉼표로 구분된 심볼 목록 (2~5개)
    pub symbols: String,
}

/// 경로 파라미터를 검증된 심볼로 변환합니다.
fn parse_symbol(raw: &str) -> ApiResult<TickerSymbol> {
    TickerSymbol::parse(raw).map_err(ApiError::from)
}

/// 종목 검색.
///
/// GET /stocks/search?query=&limit=
#[utoipa::path(
    get,
    path = "/stocks/search",
    tag = "stocks",
    params(SearchQuery),
    responses(
        (status = 200, description = "검색 제안 목록", body = SearchData),
        (status = 400, description = "검색어 길이 제한 위반")
    )
)]
pub async fn search_stocks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<ApiResponse<SearchData>>> {
    let term = query.query.trim();
    if term.is_empty() || term.chars().count() > 50 {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "검색어는 1~50자여야 합니다",
        ));
    }

    let suggestions = state.stock_service.search_stocks(term, query.limit).await;

    Ok(Json(ApiResponse::with_message(
        SearchData { suggestions },
        "Stock search completed successfully",
    )))
}

/// 인기 종목 목록.
///
/// GET /stocks/popular
#[utoipa::path(
    get,
    path = "/stocks/popular",
    tag = "stocks",
    responses((status = 200, description = "인기 종목 시세 목록", body = [StockInfo]))
)]
pub async fn get_popular_stocks(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<Vec<StockInfo>>>> {
    let stocks = state.stock_service.get_popular_stocks().await?;

    Ok(Json(ApiResponse::with_message(
        stocks,
        "Popular stocks retrieved successfully",
    )))
}

/// 시세 스냅샷.
///
/// GET /stocks/{symbol}/info
#[utoipa::path(
    get,
    path = "/stocks/{symbol}/info",
    tag = "stocks",
    params(("symbol" = String, Path, description = "티커 심볼 (예: AAPL, BRK-B)")),
    responses(
        (status = 200, description = "시세 스냅샷", body = StockInfo),
        (status = 400, description = "잘못된 심볼 형식"),
        (status = 404, description = "심볼 없음")
    )
)]
pub async fn get_stock_info(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<ApiResponse<StockInfo>>> {
    let symbol = parse_symbol(&symbol)?;
    let info = state.stock_service.get_stock_info(&symbol).await?;

    Ok(Json(ApiResponse::with_message(
        info,
        "Stock information retrieved successfully",
    )))
}

/// OHLCV 차트 시계열.
///
/// GET /stocks/{symbol}/chart?period=&interval=&chart_type=
#[utoipa::path(
    get,
    path = "/stocks/{symbol}/chart",
    tag = "stocks",
    params(("symbol" = String, Path, description = "티커 심볼"), ChartQuery),
    responses(
        (status = 200, description = "차트 시계열", body = ChartSeries),
        (status = 400, description = "잘못된 심볼 형식"),
        (status = 404, description = "차트 데이터 없음")
    )
)]
pub async fn get_stock_chart(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<Json<ApiResponse<ChartSeries>>> {
    let symbol = parse_symbol(&symbol)?;
    let series = state
        .stock_service
        .get_stock_chart(&symbol, query.period, query.interval)
        .await?;

    Ok(Json(ApiResponse::with_message(
        series,
        "Chart data retrieved successfully",
    )))
}

/// 재무 요약.
///
/// GET /stocks/{symbol}/financial
#[utoipa::path(
    get,
    path = "/stocks/{symbol}/financial",
    tag = "stocks",
    params(("symbol" = String, Path, description = "티커 심볼")),
    responses(
        (status = 200, description = "최근 기간 재무 요약", body = FinancialSummary),
        (status = 404, description = "재무 데이터 없음")
    )
)]
pub async fn get_financial_data(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<ApiResponse<FinancialSummary>>> {
    let symbol = parse_symbol(&symbol)?;
    let summary = state.stock_service.get_financial_data(&symbol).await?;

    Ok(Json(ApiResponse::with_message(
        summary,
        "Financial data retrieved successfully",
    )))
}

/// 배당 이력.
///
/// GET /stocks/{symbol}/dividends?years=
#[utoipa::path(
    get,
    path = "/stocks/{symbol}/dividends",
    tag = "stocks",
    params(("symbol" = String, Path, description = "티커 심볼"), DividendQuery),
    responses(
        (status = 200, description = "최근 N년 배당 지급 내역", body = [DividendPayment]),
        (status = 400, description = "연수 범위 초과 (1~10)")
    )
)]
pub async fn get_dividend_history(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<DividendQuery>,
) -> ApiResult<Json<ApiResponse<Vec<DividendPayment>>>> {
    let symbol = parse_symbol(&symbol)?;

    if !(1..=10).contains(&query.years) {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "조회 연수는 1~10 사이여야 합니다",
        ));
    }

    let dividends = state
        .stock_service
        .get_dividend_history(&symbol, query.years)
        .await?;

    Ok(Json(ApiResponse::with_message(
        dividends,
        "Dividend history retrieved successfully",
    )))
}

/// 종목 비교.
///
/// GET /stocks/compare?symbols=a,b,...
#[utoipa::path(
    get,
    path = "/stocks/compare",
    tag = "stocks",
    params(CompareQuery),
    responses(
        (status = 200, description = "조회에 성공한 종목의 시세 목록 (입력 순서 유지)", body = [StockInfo]),
        (status = 400, description = "심볼 개수 위반 (2~5개) 또는 형식 오류")
    )
)]
pub async fn compare_stocks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompareQuery>,
) -> ApiResult<Json<ApiResponse<Vec<StockInfo>>>> {
    let symbols: Vec<TickerSymbol> = query
        .symbols
        .split(',')
        .map(|s| parse_symbol(s.trim()))
        .collect::<ApiResult<Vec<_>>>()?;

    if symbols.len() < 2 {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "비교에는 최소 2개 종목이 필요합니다",
        ));
    }
    if symbols.len() > 5 {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "비교는 최대 5개 종목까지 가능합니다",
        ));
    }

    let comparison = state.stock_service.compare_stocks(&symbols).await?;

    Ok(Json(ApiResponse::with_message(
        comparison,
        "Stock comparison completed successfully",
    )))
}

/// 회사 프로필.
///
/// GET /stocks/{symbol}/description
#[utoipa::path(
    get,
    path = "/stocks/{symbol}/description",
    tag = "stocks",
    params(("symbol" = String, Path, description = "티커 심볼")),
    responses(
        (status = 200, description = "회사 프로필 (한글/영문 설명)", body = CompanyProfile),
        (status = 404, description = "프로필 없음")
    )
)]
pub async fn get_company_description(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<ApiResponse<CompanyProfile>>> {
    let symbol = parse_symbol(&symbol)?;
    let profile = state.stock_service.get_company_description(&symbol).await?;

    Ok(Json(ApiResponse::with_message(
        profile,
        "Company description retrieved successfully",
    )))
}

/// 시가총액 상위 10개 종목.
///
/// GET /stocks/top-market-cap
#[utoipa::path(
    get,
    path = "/stocks/top-market-cap",
    tag = "stocks",
    responses((status = 200, description = "시가총액 내림차순 상위 10개", body = [MarketCapEntry]))
)]
pub async fn get_top_market_cap_stocks(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<Vec<MarketCapEntry>>>> {
    let stocks = state.stock_service.get_top_market_cap_stocks().await?;

    Ok(Json(ApiResponse::with_message(
        stocks,
        "Top market cap stocks retrieved successfully",
    )))
}

/// 지수별 시가총액 상위 종목.
///
/// GET /stocks/index/{index_name}/stocks
#[utoipa::path(
    get,
    path = "/stocks/index/{index_name}/stocks",
    tag = "stocks",
    params(("index_name" = String, Path, description = "지수 이름 (dow, nasdaq, sp500, russell2000)")),
    responses(
        (status = 200, description = "지수 구성 종목 상위 10개", body = [MarketCapEntry]),
        (status = 400, description = "잘못된 지수 이름")
    )
)]
pub async fn get_index_stocks(
    State(state): State<Arc<AppState>>,
    Path(index_name): Path<String>,
) -> ApiResult<Json<ApiResponse<Vec<MarketCapEntry>>>> {
    let stocks = state.stock_service.get_index_stocks(&index_name).await?;

    Ok(Json(ApiResponse::with_message(
        stocks,
        format!(
            "Top stocks for {} retrieved successfully",
            index_name.to_uppercase()
        ),
    )))
}

/// 주식 라우터 생성.
pub fn stocks_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/search", get(search_stocks))
        .route("/popular", get(get_popular_stocks))
        .route("/compare", get(compare_stocks))
        .route("/top-market-cap", get(get_top_market_cap_stocks))
        .route("/index/{index_name}/stocks", get(get_index_stocks))
        .route("/{symbol}/info", get(get_stock_info))
        .route("/{symbol}/chart", get(get_stock_chart))
        .route("/{symbol}/financial", get(get_financial_data))
        .route("/{symbol}/dividends", get(get_dividend_history))
        .route("/{symbol}/description", get(get_company_description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_fixture_state;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        stocks_router().with_state(create_fixture_state())
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_stock_info_envelope() {
        let (status, json) = get_json("/AAPL/info").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["symbol"], "AAPL");
        assert!(json["data"]["currentPrice"].is_number());
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_lowercase_symbol_normalized() {
        let (status, json) = get_json("/aapl/info").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["symbol"], "AAPL");
    }

    #[tokio::test]
    async fn test_malformed_symbol_is_400() {
        let (status, json) = get_json("/TOOLONG99/info").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_404() {
        let (status, json) = get_json("/ZZZZZ/info").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_search_garbage_returns_fallback() {
        let (status, json) = get_json("/search?query=zzz-no-such-company").await;

        assert_eq!(status, StatusCode::OK);
        let suggestions = json["data"]["suggestions"].as_array().unwrap();
        assert!(!suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_search_korean_query() {
        let (status, json) = get_json("/search?query=%EC%95%A0%ED%94%8C").await; // "애플"

        assert_eq!(status, StatusCode::OK);
        let suggestions = json["data"]["suggestions"].as_array().unwrap();
        assert!(suggestions.iter().any(|s| s["symbol"] == "AAPL"));
    }

    #[tokio::test]
    async fn test_chart_defaults() {
        let (status, json) = get_json("/AAPL/chart").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["period"], "1mo");
        assert_eq!(json["data"]["interval"], "1d");
        assert!(!json["data"]["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_compare_requires_two_to_five() {
        let (status, _) = get_json("/compare?symbols=AAPL").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json("/compare?symbols=AAPL,MSFT,GOOGL,AMZN,TSLA,META").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = get_json("/compare?symbols=AAPL,MSFT").await;
        assert_eq!(status, StatusCode::OK);
        let data = json["data"].as_array().unwrap();
        assert_eq!(data[0]["symbol"], "AAPL");
        assert_eq!(data[1]["symbol"], "MSFT");
    }

    #[tokio::test]
    async fn test_invalid_index_name_is_400_naming_valid_set() {
        let (status, json) = get_json("/index/bogus/stocks").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = json["error"]["message"].as_str().unwrap();
        for valid in ["dow", "nasdaq", "sp500", "russell2000"] {
            assert!(message.contains(valid));
        }
    }

    #[tokio::test]
    async fn test_index_stocks_ranked() {
        let (status, json) = get_json("/index/dow/stocks").await;

        assert_eq!(status, StatusCode::OK);
        let data = json["data"].as_array().unwrap();
        assert!(!data.is_empty());
        assert!(data.len() <= 10);
    }

    #[tokio::test]
    async fn test_dividends_years_bounds() {
        let (status, _) = get_json("/AAPL/dividends?years=11").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = get_json("/AAPL/dividends?years=3").await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["data"].is_array());
    }

    #[tokio::test]
    async fn test_top_market_cap() {
        let (status, json) = get_json("/top-market-cap").await;

        assert_eq!(status, StatusCode::OK);
        let data = json["data"].as_array().unwrap();
        assert!(data.len() <= 10);
        // 내림차순 정렬 확인
        let caps: Vec<f64> = data
            .iter()
            .map(|e| e["marketCap"].as_f64().unwrap())
            .collect();
        assert!(caps.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_description_bilingual() {
        let (status, json) = get_json("/AAPL/description").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["data"]["originalDescription"].is_string());
        assert!(json["data"]["description"].is_string());
    }

    #[tokio::test]
    async fn test_financial_summary() {
        let (status, json) = get_json("/AAPL/financial").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["symbol"], "AAPL");
        assert!(json["data"]["revenue"].is_number());
    }
}
