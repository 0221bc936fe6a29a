//! 주식 데이터 서비스.
//!
//! 제공자 → 캐시 → 정규화 흐름을 담당하는 중심 컴포넌트.
//! 모든 조회는 캐시를 먼저 확인하고, 미스일 때만 제공자를 호출합니다.
//! 배치 조회는 세마포어로 동시성을 제한하고 재시도 정책을 적용합니다.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use quote_core::{ChartInterval, ChartPeriod, DataConfig, QuoteError, QuoteResult, TickerSymbol};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::cache::{keys, QuoteCache};
use crate::korean::{translate_korean_to_english, Translator};
use crate::model::{
    ChartSeries, CompanyProfile, DividendPayment, FinancialSummary, MarketCapEntry, StockInfo,
    StockSuggestion,
};
use crate::provider::QuoteProvider;
use crate::retry::RetryPolicy;

/// 인기 종목 심볼 (목록 조회용).
const POPULAR_SYMBOLS: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META"];

/// 검색 후보 테이블: (심볼, 회사명, 거래소).
const SEARCH_CANDIDATES: &[(&str, &str, &str)] = &[
    ("AAPL", "Apple Inc.", "NASDAQ"),
    ("MSFT", "Microsoft Corporation", "NASDAQ"),
    ("GOOGL", "Alphabet Inc.", "NASDAQ"),
    ("AMZN", "Amazon.com Inc.", "NASDAQ"),
    ("TSLA", "Tesla Inc.", "NASDAQ"),
    ("META", "Meta Platforms Inc.", "NASDAQ"),
    ("NVDA", "NVIDIA Corporation", "NASDAQ"),
    ("NFLX", "Netflix Inc.", "NASDAQ"),
    ("JPM", "JPMorgan Chase & Co.", "NYSE"),
    ("JNJ", "Johnson & Johnson", "NYSE"),
    ("V", "Visa Inc.", "NYSE"),
    ("PG", "Procter & Gamble Co.", "NYSE"),
    ("UNH", "UnitedHealth Group Inc.", "NYSE"),
    ("HD", "Home Depot Inc.", "NYSE"),
    ("DIS", "Walt Disney Co.", "NYSE"),
    ("PYPL", "PayPal Holdings Inc.", "NASDAQ"),
    ("ADBE", "Adobe Inc.", "NASDAQ"),
    ("CRM", "Salesforce Inc.", "NYSE"),
    ("INTC", "Intel Corporation", "NASDAQ"),
    ("VZ", "Verizon Communications Inc.", "NYSE"),
    ("PLTR", "Palantir Technologies Inc.", "NYSE"),
];

/// 시가총액 상위 후보 티커 (대형주 고정 목록).
const TOP_MARKET_CAP_TICKERS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "BRK-B", "LLY", "TSM", "V",
];

/// 다우존스 구성 종목.
static DOW_CONSTITUENTS: &[&str] = &[
    "AAPL", "MSFT", "JPM", "JNJ", "V", "PG", "HD", "UNH", "MA", "DIS", "WMT", "KO", "PFE", "T",
    "VZ", "MRK", "ABT", "CVX", "XOM", "CSCO", "NKE", "MCD", "BA", "CAT", "IBM", "GS", "AXP",
    "MMM", "DOW", "WBA",
];

/// 나스닥 주요 구성 종목.
static NASDAQ_CONSTITUENTS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "NFLX", "ADBE", "PYPL", "INTC",
    "AMD", "CRM", "ORCL", "CSCO", "QCOM", "AVGO", "TXN", "MU", "ADI", "KLAC", "LRCX", "ASML",
    "AMAT", "CHTR", "CMCSA", "COST", "PEP", "TMUS",
];

/// S&P 500 주요 구성 종목.
static SP500_CONSTITUENTS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "BRK-B", "LLY", "TSM", "V", "UNH", "JNJ",
    "JPM", "PG", "HD", "MA", "DIS", "PFE", "ABBV", "KO", "PEP", "AVGO", "COST", "TMO", "DHR",
    "ACN", "WMT", "MRK", "VZ", "TXN",
];

/// 러셀 2000 관련 ETF 목록.
static RUSSELL2000_CONSTITUENTS: &[&str] = &[
    "IWM", "SMH", "XBI", "ARKK", "TQQQ", "SOXL", "LABU", "DPST", "ERX", "TMF", "UCO", "SCO",
    "UGA", "UNG", "USO", "BNO", "XOP", "XLE", "XLF", "XLK", "XLV", "XLI", "XLP", "XLY", "XLU",
    "XLB", "XLC", "XLRE", "XME", "XRT",
];

/// 지수 이름으로 구성 종목 목록을 조회합니다.
fn index_constituents(index_name: &str) -> Option<&'static [&'static str]> {
    match index_name {
        "dow" => Some(DOW_CONSTITUENTS),
        "nasdaq" => Some(NASDAQ_CONSTITUENTS),
        "sp500" => Some(SP500_CONSTITUENTS),
        "russell2000" => Some(RUSSELL2000_CONSTITUENTS),
        _ => None,
    }
}

/// 정적 심볼 목록을 `TickerSymbol`로 변환합니다.
fn parse_static_symbols(list: &[&str]) -> Vec<TickerSymbol> {
    list.iter()
        .filter_map(|s| TickerSymbol::parse(s).ok())
        .collect()
}

/// 주식 데이터 서비스.
///
/// 제공자와 캐시는 생성자가 주입합니다. 테스트는 픽스처/카운팅
/// 제공자와 독립된 캐시 인스턴스로 서비스를 구성합니다.
pub struct StockService {
    provider: Arc<dyn QuoteProvider>,
    cache: Arc<QuoteCache>,
    translator: Translator,
    fetch_permits: Arc<Semaphore>,
    retry: RetryPolicy,
    quote_ttl: Duration,
    default_ttl: Duration,
    batch_ttl: Duration,
}

impl StockService {
    /// 새 서비스를 생성합니다.
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        cache: Arc<QuoteCache>,
        config: &DataConfig,
    ) -> Self {
        Self {
            provider,
            cache,
            translator: Translator::new(),
            fetch_permits: Arc::new(Semaphore::new(config.max_concurrent_fetches.max(1))),
            retry: RetryPolicy::from_config(config),
            quote_ttl: Duration::from_secs(config.quote_ttl_secs),
            default_ttl: Duration::from_secs(config.default_ttl_secs),
            batch_ttl: Duration::from_secs(config.batch_ttl_secs),
        }
    }

    /// 제공자 이름 (헬스 체크용).
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// 시세 스냅샷 조회 (캐시 적용).
    pub async fn get_stock_info(&self, symbol: &TickerSymbol) -> QuoteResult<StockInfo> {
        let key = keys::stock_info(symbol.as_str());
        if let Some(cached) = self.cache.get::<StockInfo>(&key).await {
            debug!(symbol = %symbol, "캐시된 시세 반환");
            return Ok(cached);
        }

        let info = self
            .provider
            .fetch_quote(symbol)
            .await?
            .with_computed_change();

        self.cache.set(&key, &info, self.quote_ttl).await;
        Ok(info)
    }

    /// 차트 시계열 조회 (캐시 적용).
    pub async fn get_stock_chart(
        &self,
        symbol: &TickerSymbol,
        period: ChartPeriod,
        interval: ChartInterval,
    ) -> QuoteResult<ChartSeries> {
        let key = keys::chart(symbol.as_str(), period.as_str(), interval.as_str());
        if let Some(cached) = self.cache.get::<ChartSeries>(&key).await {
            debug!(symbol = %symbol, "캐시된 차트 반환");
            return Ok(cached);
        }

        let data = self.provider.fetch_history(symbol, period, interval).await?;
        let series = ChartSeries {
            symbol: symbol.as_str().to_string(),
            period: period.as_str().to_string(),
            interval: interval.as_str().to_string(),
            data,
        };

        self.cache.set(&key, &series, self.default_ttl).await;
        Ok(series)
    }

    /// 종목 검색 (한글 검색 지원).
    ///
    /// 검색어와 영문 변환어를 심볼/회사명에 대해 대소문자 무시 부분
    /// 일치로 비교합니다. 일치 항목이 없으면 인기 종목 상위 `limit`개를
    /// 반환하므로, 호출자는 "일치 없음"과 "검색 안 함"을 구분할 수
    /// 없습니다.
    pub async fn search_stocks(&self, query: &str, limit: usize) -> Vec<StockSuggestion> {
        let english = translate_korean_to_english(query);

        let query_upper = query.trim().to_uppercase();
        let query_lower = query.trim().to_lowercase();
        let english_upper = english.to_uppercase();
        let english_lower = english.to_lowercase();

        let mut suggestions: Vec<StockSuggestion> = SEARCH_CANDIDATES
            .iter()
            .filter(|(symbol, name, _)| {
                let name_lower = name.to_lowercase();
                symbol.contains(&query_upper)
                    || name_lower.contains(&query_lower)
                    || symbol.contains(&english_upper)
                    || name_lower.contains(&english_lower)
            })
            .map(Self::to_suggestion)
            .collect();

        if suggestions.is_empty() {
            debug!(query = query, "검색 결과 없음, 인기 종목으로 대체");
            suggestions = SEARCH_CANDIDATES
                .iter()
                .take(limit)
                .map(Self::to_suggestion)
                .collect();
        }

        suggestions.truncate(limit);
        suggestions
    }

    fn to_suggestion((symbol, name, exchange): &(&str, &str, &str)) -> StockSuggestion {
        StockSuggestion {
            symbol: symbol.to_string(),
            name: name.to_string(),
            exchange: exchange.to_string(),
            kind: "Common Stock".to_string(),
            country: "US".to_string(),
        }
    }

    /// 인기 종목 목록 조회.
    ///
    /// 개별 종목 조회 실패는 목록에서 제외합니다.
    pub async fn get_popular_stocks(&self) -> QuoteResult<Vec<StockInfo>> {
        let symbols = parse_static_symbols(POPULAR_SYMBOLS);
        self.compare_stocks(&symbols).await
    }

    /// 최근 기간 재무 요약 조회 (캐시 적용).
    pub async fn get_financial_data(&self, symbol: &TickerSymbol) -> QuoteResult<FinancialSummary> {
        let key = keys::financials(symbol.as_str());
        if let Some(cached) = self.cache.get::<FinancialSummary>(&key).await {
            return Ok(cached);
        }

        let summary = self.provider.fetch_financials(symbol).await?;
        self.cache.set(&key, &summary, self.default_ttl).await;
        Ok(summary)
    }

    /// 배당 이력 조회 (최근 `years`년, 캐시 적용).
    ///
    /// 날짜 비교는 양쪽 모두 타임존 없는 `NaiveDate`로 수행합니다.
    pub async fn get_dividend_history(
        &self,
        symbol: &TickerSymbol,
        years: u32,
    ) -> QuoteResult<Vec<DividendPayment>> {
        let key = keys::dividends(symbol.as_str(), years);
        if let Some(cached) = self.cache.get::<Vec<DividendPayment>>(&key).await {
            return Ok(cached);
        }

        let payments = self.provider.fetch_dividends(symbol).await?;
        let cutoff = Utc::now().date_naive() - ChronoDuration::days(365 * i64::from(years));
        let recent: Vec<DividendPayment> =
            payments.into_iter().filter(|p| p.date > cutoff).collect();

        self.cache.set(&key, &recent, self.default_ttl).await;
        Ok(recent)
    }

    /// 여러 종목 비교.
    ///
    /// 입력 순서를 유지하며, 조회에 실패한 종목은 조용히 제외됩니다.
    pub async fn compare_stocks(&self, symbols: &[TickerSymbol]) -> QuoteResult<Vec<StockInfo>> {
        let mut results = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match self.get_stock_info(symbol).await {
                Ok(info) => results.push(info),
                Err(e) => {
                    debug!(symbol = %symbol, error = %e, "종목 조회 실패, 결과에서 제외");
                }
            }
        }
        Ok(results)
    }

    /// 회사 프로필 조회 (한글 설명 포함, 캐시 적용).
    pub async fn get_company_description(
        &self,
        symbol: &TickerSymbol,
    ) -> QuoteResult<CompanyProfile> {
        let key = keys::profile(symbol.as_str());
        if let Some(cached) = self.cache.get::<CompanyProfile>(&key).await {
            return Ok(cached);
        }

        let mut profile = self.provider.fetch_profile(symbol).await?;
        if profile.description.is_none() {
            profile.description = Some(
                self.translator
                    .translate_to_korean(&profile.original_description)
                    .await,
            );
        }

        self.cache.set(&key, &profile, self.default_ttl).await;
        Ok(profile)
    }

    /// 시가총액 상위 10개 종목 조회 (캐시 적용).
    pub async fn get_top_market_cap_stocks(&self) -> QuoteResult<Vec<MarketCapEntry>> {
        let key = keys::top_market_cap();
        if let Some(cached) = self.cache.get::<Vec<MarketCapEntry>>(&key).await {
            debug!("캐시된 시가총액 랭킹 반환");
            return Ok(cached);
        }

        let tickers = parse_static_symbols(TOP_MARKET_CAP_TICKERS);
        let infos = self.get_stock_info_batch(&tickers).await?;
        let entries = Self::rank_by_market_cap(&infos);

        self.cache.set(&key, &entries, self.default_ttl).await;
        Ok(entries)
    }

    /// 지수별 시가총액 상위 10개 종목 조회 (캐시 적용).
    ///
    /// # Errors
    /// 지수 이름이 `dow|nasdaq|sp500|russell2000`이 아니면
    /// `QuoteError::InvalidInput`을 반환합니다.
    pub async fn get_index_stocks(&self, index_name: &str) -> QuoteResult<Vec<MarketCapEntry>> {
        let index_name = index_name.to_lowercase();
        let constituents = index_constituents(&index_name).ok_or_else(|| {
            QuoteError::InvalidInput(format!(
                "잘못된 지수 이름: {}. 유효한 값: dow, nasdaq, sp500, russell2000",
                index_name
            ))
        })?;

        let key = keys::index_stocks(&index_name);
        if let Some(cached) = self.cache.get::<Vec<MarketCapEntry>>(&key).await {
            debug!(index = index_name, "캐시된 지수 구성 종목 반환");
            return Ok(cached);
        }

        let tickers = parse_static_symbols(constituents);
        let infos = self.get_stock_info_batch(&tickers).await?;
        let entries = Self::rank_by_market_cap(&infos);

        self.cache.set(&key, &entries, self.default_ttl).await;
        Ok(entries)
    }

    /// 여러 종목 시세를 배치로 조회 (캐시 적용).
    ///
    /// 동시 업스트림 호출은 세마포어로 제한되고, 각 호출은 재시도
    /// 정책으로 감쌉니다. 실패한 종목은 결과에서 제외됩니다.
    pub async fn get_stock_info_batch(
        &self,
        tickers: &[TickerSymbol],
    ) -> QuoteResult<Vec<StockInfo>> {
        let ticker_strings: Vec<String> =
            tickers.iter().map(|t| t.as_str().to_string()).collect();
        let key = keys::batch_stocks(&ticker_strings);

        if let Some(cached) = self.cache.get::<Vec<StockInfo>>(&key).await {
            debug!(count = tickers.len(), "캐시된 배치 결과 반환");
            return Ok(cached);
        }

        let fetches = tickers.iter().map(|symbol| async move {
            let _permit = match self.fetch_permits.acquire().await {
                Ok(permit) => permit,
                Err(_) => return None,
            };

            match self.retry.run(|| self.get_stock_info(symbol)).await {
                Ok(info) => Some(info),
                Err(e) => {
                    warn!(symbol = %symbol, error = %e, "배치 조회 실패, 해당 종목 제외");
                    None
                }
            }
        });

        let infos: Vec<StockInfo> = futures::future::join_all(fetches)
            .await
            .into_iter()
            .flatten()
            .collect();

        self.cache.set(&key, &infos, self.batch_ttl).await;
        Ok(infos)
    }

    /// 시가총액 내림차순 상위 10개로 변환합니다.
    fn rank_by_market_cap(infos: &[StockInfo]) -> Vec<MarketCapEntry> {
        let mut entries: Vec<MarketCapEntry> = infos
            .iter()
            .filter(|info| info.market_cap.unwrap_or(0.0) > 0.0)
            .map(MarketCapEntry::from)
            .collect();

        entries.sort_by(|a, b| {
            b.market_cap
                .partial_cmp(&a.market_cap)
                .unwrap_or(Ordering::Equal)
        });
        entries.truncate(10);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::FixtureProvider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

    /// 업스트림 호출 횟수를 세는 래퍼 제공자.
    struct CountingProvider {
        inner: FixtureProvider,
        quote_calls: AtomicUsize,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                inner: FixtureProvider::new(),
                quote_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl QuoteProvider for CountingProvider {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn fetch_quote(&self, symbol: &TickerSymbol) -> QuoteResult<StockInfo> {
            self.quote_calls.fetch_add(1, AtomicOrdering::SeqCst);
            self.inner.fetch_quote(symbol).await
        }

        async fn fetch_history(
            &self,
            symbol: &TickerSymbol,
            period: ChartPeriod,
            interval: ChartInterval,
        ) -> QuoteResult<Vec<crate::model::ChartPoint>> {
            self.inner.fetch_history(symbol, period, interval).await
        }

        async fn fetch_financials(&self, symbol: &TickerSymbol) -> QuoteResult<FinancialSummary> {
            self.inner.fetch_financials(symbol).await
        }

        async fn fetch_dividends(
            &self,
            symbol: &TickerSymbol,
        ) -> QuoteResult<Vec<DividendPayment>> {
            self.inner.fetch_dividends(symbol).await
        }

        async fn fetch_profile(&self, symbol: &TickerSymbol) -> QuoteResult<CompanyProfile> {
            self.inner.fetch_profile(symbol).await
        }
    }

    /// 동시 실행 수를 추적하는 제공자.
    struct ConcurrencyProbe {
        inner: FixtureProvider,
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ConcurrencyProbe {
        fn new() -> Self {
            Self {
                inner: FixtureProvider::new(),
                current: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl QuoteProvider for ConcurrencyProbe {
        fn name(&self) -> &'static str {
            "probe"
        }

        async fn fetch_quote(&self, symbol: &TickerSymbol) -> QuoteResult<StockInfo> {
            let now = self.current.fetch_add(1, AtomicOrdering::SeqCst) + 1;
            self.peak.fetch_max(now, AtomicOrdering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            let result = self.inner.fetch_quote(symbol).await;
            self.current.fetch_sub(1, AtomicOrdering::SeqCst);
            result
        }

        async fn fetch_history(
            &self,
            symbol: &TickerSymbol,
            period: ChartPeriod,
            interval: ChartInterval,
        ) -> QuoteResult<Vec<crate::model::ChartPoint>> {
            self.inner.fetch_history(symbol, period, interval).await
        }

        async fn fetch_financials(&self, symbol: &TickerSymbol) -> QuoteResult<FinancialSummary> {
            self.inner.fetch_financials(symbol).await
        }

        async fn fetch_dividends(
            &self,
            symbol: &TickerSymbol,
        ) -> QuoteResult<Vec<DividendPayment>> {
            self.inner.fetch_dividends(symbol).await
        }

        async fn fetch_profile(&self, symbol: &TickerSymbol) -> QuoteResult<CompanyProfile> {
            self.inner.fetch_profile(symbol).await
        }
    }

    fn symbol(s: &str) -> TickerSymbol {
        TickerSymbol::parse(s).unwrap()
    }

    fn service_with(provider: Arc<dyn QuoteProvider>) -> StockService {
        StockService::new(provider, Arc::new(QuoteCache::new(256)), &DataConfig::default())
    }

    #[tokio::test]
    async fn test_quote_is_normalized() {
        let service = service_with(Arc::new(FixtureProvider::new()));
        let info = service.get_stock_info(&symbol("AAPL")).await.unwrap();

        let expected =
            (info.current_price - info.previous_close) / info.previous_close * 100.0;
        assert_eq!(info.change, info.current_price - info.previous_close);
        assert_eq!(info.change_percent, expected);
    }

    #[tokio::test]
    async fn test_quote_cache_prevents_second_fetch() {
        let provider = Arc::new(CountingProvider::new());
        let cache = Arc::new(QuoteCache::new(256));
        let service = StockService::new(provider.clone(), cache.clone(), &DataConfig::default());

        let first = service.get_stock_info(&symbol("AAPL")).await.unwrap();
        let second = service.get_stock_info(&symbol("AAPL")).await.unwrap();

        assert_eq!(provider.quote_calls.load(AtomicOrdering::SeqCst), 1);
        assert_eq!(first, second);

        // TTL 만료 후에는 다시 조회
        cache
            .backdate(&keys::stock_info("AAPL"), Duration::from_secs(601))
            .await;
        let _ = service.get_stock_info(&symbol("AAPL")).await.unwrap();
        assert_eq!(provider.quote_calls.load(AtomicOrdering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_search_korean_query() {
        let service = service_with(Arc::new(FixtureProvider::new()));

        let results = service.search_stocks("애플", 10).await;
        assert!(results.iter().any(|s| s.symbol == "AAPL"));

        let results = service.search_stocks("테슬라", 10).await;
        assert!(results.iter().any(|s| s.symbol == "TSLA"));
    }

    #[tokio::test]
    async fn test_search_fallback_is_non_empty() {
        let service = service_with(Arc::new(FixtureProvider::new()));

        let results = service.search_stocks("zzz-no-such-company", 10).await;
        assert!(!results.is_empty());
        assert_eq!(results.len(), 10);
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let service = service_with(Arc::new(FixtureProvider::new()));

        let results = service.search_stocks("a", 3).await;
        assert!(results.len() <= 3);
    }

    #[tokio::test]
    async fn test_compare_preserves_order_and_drops_failures() {
        let service = service_with(Arc::new(FixtureProvider::new()));

        let symbols = vec![symbol("AAPL"), symbol("ZZZZZ"), symbol("MSFT")];
        let results = service.compare_stocks(&symbols).await.unwrap();

        let returned: Vec<&str> = results.iter().map(|i| i.symbol.as_str()).collect();
        assert_eq!(returned, vec!["AAPL", "MSFT"]);
    }

    #[tokio::test]
    async fn test_popular_stocks() {
        let service = service_with(Arc::new(FixtureProvider::new()));
        let stocks = service.get_popular_stocks().await.unwrap();

        assert_eq!(stocks.len(), POPULAR_SYMBOLS.len());
        assert_eq!(stocks[0].symbol, "AAPL");
    }

    #[tokio::test]
    async fn test_invalid_index_name() {
        let service = service_with(Arc::new(FixtureProvider::new()));
        let err = service.get_index_stocks("bogus").await.unwrap_err();

        match err {
            QuoteError::InvalidInput(message) => {
                for valid in ["dow", "nasdaq", "sp500", "russell2000"] {
                    assert!(message.contains(valid), "message missing {valid}: {message}");
                }
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_index_stocks_sorted_by_market_cap() {
        let service = service_with(Arc::new(FixtureProvider::new()));
        let entries = service.get_index_stocks("dow").await.unwrap();

        assert!(!entries.is_empty());
        assert!(entries.len() <= 10);
        for window in entries.windows(2) {
            assert!(window[0].market_cap >= window[1].market_cap);
        }
    }

    #[tokio::test]
    async fn test_top_market_cap_stocks() {
        let service = service_with(Arc::new(FixtureProvider::new()));
        let entries = service.get_top_market_cap_stocks().await.unwrap();

        assert!(entries.len() <= 10);
        // 픽스처 기준 최대 시가총액은 MSFT
        assert_eq!(entries[0].symbol, "MSFT");
        assert!(entries.iter().all(|e| e.market_cap > 0.0));
    }

    #[tokio::test]
    async fn test_batch_bounded_concurrency() {
        let probe = Arc::new(ConcurrencyProbe::new());
        let service = StockService::new(
            probe.clone(),
            Arc::new(QuoteCache::new(256)),
            &DataConfig::default(),
        );

        let tickers = parse_static_symbols(&[
            "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "NFLX", "JPM", "JNJ",
        ]);
        let infos = service.get_stock_info_batch(&tickers).await.unwrap();

        assert_eq!(infos.len(), 10);
        assert!(probe.peak.load(AtomicOrdering::SeqCst) <= 5);
    }

    #[tokio::test]
    async fn test_batch_cache_is_order_insensitive() {
        let provider = Arc::new(CountingProvider::new());
        let service = StockService::new(
            provider.clone(),
            Arc::new(QuoteCache::new(256)),
            &DataConfig::default(),
        );

        let forward = vec![symbol("AAPL"), symbol("MSFT")];
        let backward = vec![symbol("MSFT"), symbol("AAPL")];

        let _ = service.get_stock_info_batch(&forward).await.unwrap();
        let calls_after_first = provider.quote_calls.load(AtomicOrdering::SeqCst);

        let _ = service.get_stock_info_batch(&backward).await.unwrap();
        assert_eq!(provider.quote_calls.load(AtomicOrdering::SeqCst), calls_after_first);
    }

    #[tokio::test]
    async fn test_dividend_history_filters_by_years() {
        let service = service_with(Arc::new(FixtureProvider::new()));

        let recent = service
            .get_dividend_history(&symbol("AAPL"), 2)
            .await
            .unwrap();
        let cutoff = Utc::now().date_naive() - ChronoDuration::days(365 * 2);

        assert_eq!(recent.len(), 8);
        assert!(recent.iter().all(|p| p.date > cutoff));
    }

    #[tokio::test]
    async fn test_description_has_korean_text() {
        let service = service_with(Arc::new(FixtureProvider::new()));
        let profile = service
            .get_company_description(&symbol("AAPL"))
            .await
            .unwrap();

        assert!(!profile.original_description.is_empty());
        let korean = profile.description.unwrap();
        assert!(korean.chars().any(|c| ('가'..='힣').contains(&c)));
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_not_found() {
        let service = service_with(Arc::new(FixtureProvider::new()));
        let result = service.get_stock_info(&symbol("ZZZZZ")).await;
        assert!(matches!(result, Err(QuoteError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_chart_series_shape() {
        let service = service_with(Arc::new(FixtureProvider::new()));
        let series = service
            .get_stock_chart(&symbol("AAPL"), ChartPeriod::OneMonth, ChartInterval::OneDay)
            .await
            .unwrap();

        assert_eq!(series.symbol, "AAPL");
        assert_eq!(series.period, "1mo");
        assert_eq!(series.interval, "1d");
        assert!(!series.data.is_empty());
    }
}
