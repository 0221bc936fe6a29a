//! OpenAPI 문서 및 Swagger UI.
//!
//! `/swagger-ui`에서 API 문서를, `/api-docs/openapi.json`에서 스펙을
//! 제공합니다.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// Bearer 토큰 보안 스킴 등록.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// API 문서 정의.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stock Dashboard API",
        description = "미국 주식 정보 대시보드 API",
        version = "0.1.0"
    ),
    paths(
        crate::routes::health::health_check,
        crate::routes::health::health_ready,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::stocks::search_stocks,
        crate::routes::stocks::get_popular_stocks,
        crate::routes::stocks::get_stock_info,
        crate::routes::stocks::get_stock_chart,
        crate::routes::stocks::get_financial_data,
        crate::routes::stocks::get_dividend_history,
        crate::routes::stocks::compare_stocks,
        crate::routes::stocks::get_company_description,
        crate::routes::stocks::get_top_market_cap_stocks,
        crate::routes::stocks::get_index_stocks,
    ),
    components(schemas(
        quote_data::StockInfo,
        quote_data::ChartPoint,
        quote_data::ChartSeries,
        quote_data::FinancialSummary,
        quote_data::DividendPayment,
        quote_data::StockSuggestion,
        quote_data::CompanyProfile,
        quote_data::MarketCapEntry,
        crate::routes::stocks::SearchData,
        crate::routes::auth::RegisterRequest,
        crate::routes::auth::LoginRequest,
        crate::auth::LoginData,
        crate::auth::UserSummary,
        crate::repository::User,
        crate::routes::health::HealthResponse,
        crate::routes::health::ComponentHealth,
        crate::routes::health::ComponentStatus,
        crate::error::ApiErrorBody,
        crate::error::ErrorEnvelope,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "헬스 체크"),
        (name = "auth", description = "인증"),
        (name = "stocks", description = "주식 데이터")
    )
)]
pub struct ApiDoc;

/// Swagger UI 라우터 생성.
pub fn swagger_ui_router() -> axum::Router {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_serializes() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("/stocks/search"));
        assert!(json.contains("/stocks/{symbol}/info"));
        assert!(json.contains("/auth/login"));
    }
}
