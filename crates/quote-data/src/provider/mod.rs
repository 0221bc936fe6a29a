//! 시장 데이터 제공자.
//!
//! 업스트림 시장 데이터 제공자는 전부 [`QuoteProvider`] 트레이트 뒤에
//! 있습니다. `StockService`는 구체 제공자를 알지 못하며, 테스트는
//! 픽스처/카운팅 구현으로 서비스를 검증합니다.

mod fixture;
mod yahoo;

pub use fixture::FixtureProvider;
pub use yahoo::YahooProvider;

use async_trait::async_trait;
use quote_core::{ChartInterval, ChartPeriod, QuoteResult, TickerSymbol};

use crate::model::{ChartPoint, CompanyProfile, DividendPayment, FinancialSummary, StockInfo};

/// 시장 데이터 제공자 인터페이스.
///
/// 모든 메서드는 "찾을 수 없음"을 `QuoteError::NotFound`로 표현합니다.
/// 배당이 없는 종목의 배당 이력만 예외적으로 빈 목록입니다 (종목은
/// 존재하므로).
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// 제공자 이름 (로그/헬스 체크용).
    fn name(&self) -> &'static str;

    /// 시세 스냅샷 조회.
    ///
    /// 변동폭/변동률 필드는 서비스가 다시 계산하므로 채우지 않아도
    /// 됩니다.
    async fn fetch_quote(&self, symbol: &TickerSymbol) -> QuoteResult<StockInfo>;

    /// OHLCV 시계열 조회 (타임스탬프 오름차순).
    async fn fetch_history(
        &self,
        symbol: &TickerSymbol,
        period: ChartPeriod,
        interval: ChartInterval,
    ) -> QuoteResult<Vec<ChartPoint>>;

    /// 최근 기간 재무 요약 조회.
    async fn fetch_financials(&self, symbol: &TickerSymbol) -> QuoteResult<FinancialSummary>;

    /// 배당 지급 이력 조회 (날짜 오름차순, 최근 10년 범위).
    async fn fetch_dividends(&self, symbol: &TickerSymbol) -> QuoteResult<Vec<DividendPayment>>;

    /// 회사 프로필 조회.
    ///
    /// `description`(한글)은 비워둘 수 있으며, 이 경우 서비스가 번역을
    /// 수행합니다.
    async fn fetch_profile(&self, symbol: &TickerSymbol) -> QuoteResult<CompanyProfile>;
}
