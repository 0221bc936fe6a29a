//! Yahoo Finance 제공자.
//!
//! 시세/차트/재무는 `yahoo_finance_api` 크레이트를 사용하고,
//! 크레이트가 다루지 않는 배당 이벤트와 회사 프로필은 reqwest로
//! 직접 조회합니다.
//!
//! ## 데이터 소스
//! - `get_quote_range`: OHLCV, 현재가/전일 종가, 52주 고저, 평균 거래량
//! - `get_ticker_info`: 회사명, 시가총액, PER, 배당수익률, 재무 지표
//! - `/v8/finance/chart?events=div`: 배당 지급 이력
//! - `/v10/finance/quoteSummary?modules=assetProfile`: 회사 프로필

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use quote_core::{ChartInterval, ChartPeriod, QuoteError, QuoteResult, TickerSymbol};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::model::{ChartPoint, CompanyProfile, DividendPayment, FinancialSummary, StockInfo};
use crate::provider::QuoteProvider;

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_BASE_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";

/// Yahoo Finance 기반 실시세 제공자.
pub struct YahooProvider {
    /// API 커넥터 (`get_ticker_info`가 mutable을 요구하므로 Mutex로 보호)
    connector: Mutex<yahoo_finance_api::YahooConnector>,
    /// 배당/프로필 엔드포인트용 HTTP 클라이언트
    client: Client,
}

impl YahooProvider {
    /// 새 제공자를 생성합니다.
    ///
    /// # Errors
    /// 커넥터 또는 HTTP 클라이언트 생성에 실패하면
    /// `QuoteError::Upstream`을 반환합니다.
    pub fn new() -> QuoteResult<Self> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| QuoteError::Upstream(format!("Yahoo Finance 연결 실패: {}", e)))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .map_err(|e| QuoteError::Upstream(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            connector: Mutex::new(connector),
            client,
        })
    }

    /// Yahoo API 에러를 서비스 에러로 변환합니다.
    fn map_api_error(symbol: &str, err: yahoo_finance_api::YahooError) -> QuoteError {
        let message = err.to_string();
        if message.contains("429") {
            QuoteError::RateLimited(format!("Yahoo Finance 요청 한도 초과 ({})", symbol))
        } else {
            QuoteError::Upstream(format!("Yahoo Finance API 오류 ({}): {}", symbol, message))
        }
    }

    /// HTTP 상태 코드를 서비스 에러로 변환합니다.
    fn map_http_status(symbol: &str, status: reqwest::StatusCode) -> QuoteError {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            QuoteError::RateLimited(format!("Yahoo Finance 요청 한도 초과 ({})", symbol))
        } else if status == reqwest::StatusCode::NOT_FOUND {
            QuoteError::NotFound(symbol.to_string())
        } else {
            QuoteError::Upstream(format!(
                "Yahoo Finance HTTP {} ({})",
                status.as_u16(),
                symbol
            ))
        }
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_quote(&self, symbol: &TickerSymbol) -> QuoteResult<StockInfo> {
        let ticker = symbol.as_str();
        debug!(symbol = ticker, "Yahoo Finance 시세 조회");

        // 1년치 일봉으로 현재가/전일 종가/52주 고저/평균 거래량 계산
        let response = {
            let connector = self.connector.lock().await;
            connector
                .get_quote_range(ticker, "1d", "1y")
                .await
                .map_err(|e| Self::map_api_error(ticker, e))?
        };

        let quotes = response
            .quotes()
            .map_err(|e| QuoteError::Parse(format!("Quote 파싱 오류 ({}): {}", ticker, e)))?;

        if quotes.is_empty() {
            return Err(QuoteError::NotFound(format!("시세 데이터 없음: {}", ticker)));
        }

        let latest = quotes.last().unwrap();
        let previous_close = if quotes.len() >= 2 {
            quotes[quotes.len() - 2].close
        } else {
            latest.close
        };

        let week_52_high = quotes.iter().map(|q| q.high).fold(f64::MIN, f64::max);
        let week_52_low = quotes.iter().map(|q| q.low).fold(f64::MAX, f64::min);
        let avg_volume = if quotes.is_empty() {
            None
        } else {
            Some((quotes.iter().map(|q| q.volume).sum::<u64>() / quotes.len() as u64) as i64)
        };

        let currency = response
            .metadata()
            .ok()
            .and_then(|m| m.currency.clone())
            .unwrap_or_else(|| "USD".to_string());

        // ticker info에서 회사명/시가총액/PER/배당수익률 추출
        let mut name = ticker.to_string();
        let mut market_cap = None;
        let mut pe_ratio = None;
        let mut dividend_yield = None;

        let info_result = {
            let mut connector = self.connector.lock().await;
            connector.get_ticker_info(ticker).await
        };

        match info_result {
            Ok(summary) => {
                let result_data = summary
                    .quote_summary
                    .and_then(|qs| qs.result)
                    .and_then(|r| r.into_iter().next());

                if let Some(data) = result_data {
                    if let Some(quote_name) = data
                        .quote_type
                        .as_ref()
                        .and_then(|qt| qt.long_name.clone().or(qt.short_name.clone()))
                    {
                        name = quote_name;
                    }

                    let summary_detail = data.summary_detail.as_ref();
                    market_cap = summary_detail.and_then(|sd| sd.market_cap).map(|v| v as f64);
                    pe_ratio = summary_detail.and_then(|sd| sd.trailing_pe);
                    dividend_yield = summary_detail
                        .and_then(|sd| sd.trailing_annual_dividend_yield)
                        .map(|v| v * 100.0);
                }
            }
            Err(e) => {
                warn!(symbol = ticker, error = %e, "ticker info 조회 실패, 시세만 반환");
            }
        }

        Ok(StockInfo {
            symbol: ticker.to_string(),
            name,
            current_price: latest.close,
            previous_close,
            change: 0.0,
            change_percent: 0.0,
            high: Some(latest.high),
            low: Some(latest.low),
            volume: Some(latest.volume as i64),
            market_cap,
            pe_ratio,
            dividend_yield,
            beta: None,
            fifty_two_week_high: Some(week_52_high),
            fifty_two_week_low: Some(week_52_low),
            avg_volume,
            currency,
            exchange: None,
            sector: None,
            industry: None,
        })
    }

    async fn fetch_history(
        &self,
        symbol: &TickerSymbol,
        period: ChartPeriod,
        interval: ChartInterval,
    ) -> QuoteResult<Vec<ChartPoint>> {
        let ticker = symbol.as_str();
        debug!(
            symbol = ticker,
            period = period.as_str(),
            interval = interval.as_str(),
            "Yahoo Finance 차트 조회"
        );

        let response = {
            let connector = self.connector.lock().await;
            connector
                .get_quote_range(ticker, interval.as_str(), period.as_str())
                .await
                .map_err(|e| Self::map_api_error(ticker, e))?
        };

        let quotes = response
            .quotes()
            .map_err(|e| QuoteError::Parse(format!("Quote 파싱 오류 ({}): {}", ticker, e)))?;

        if quotes.is_empty() {
            return Err(QuoteError::NotFound(format!("차트 데이터 없음: {}", ticker)));
        }

        // JSON 직렬화 가능한 기본 타입으로 변환
        let mut points: Vec<ChartPoint> = quotes
            .iter()
            .map(|q| {
                let timestamp = Utc
                    .timestamp_opt(q.timestamp as i64, 0)
                    .single()
                    .unwrap_or_else(Utc::now);
                ChartPoint {
                    timestamp: timestamp.to_rfc3339(),
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume as i64,
                }
            })
            .collect();

        points.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        Ok(points)
    }

    async fn fetch_financials(&self, symbol: &TickerSymbol) -> QuoteResult<FinancialSummary> {
        let ticker = symbol.as_str();
        debug!(symbol = ticker, "Yahoo Finance 재무 요약 조회");

        let summary = {
            let mut connector = self.connector.lock().await;
            connector
                .get_ticker_info(ticker)
                .await
                .map_err(|e| Self::map_api_error(ticker, e))?
        };

        let result_data = summary
            .quote_summary
            .and_then(|qs| qs.result)
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| QuoteError::NotFound(format!("재무 데이터 없음: {}", ticker)))?;

        let financial_data = result_data.financial_data.as_ref();
        let revenue = financial_data
            .and_then(|fd| fd.total_revenue)
            .map(|v| v as f64);

        // 순이익/영업이익은 별도 재무제표 API가 없어 마진율로 근사
        let net_income = match (revenue, financial_data.and_then(|fd| fd.profit_margins)) {
            (Some(rev), Some(margin)) => Some(rev * margin),
            _ => None,
        };
        let operating_income = match (revenue, financial_data.and_then(|fd| fd.operating_margins)) {
            (Some(rev), Some(margin)) => Some(rev * margin),
            _ => None,
        };

        if revenue.is_none() && net_income.is_none() && operating_income.is_none() {
            return Err(QuoteError::NotFound(format!("재무 데이터 없음: {}", ticker)));
        }

        Ok(FinancialSummary {
            symbol: ticker.to_string(),
            period: "TTM".to_string(),
            revenue,
            net_income,
            operating_income,
        })
    }

    async fn fetch_dividends(&self, symbol: &TickerSymbol) -> QuoteResult<Vec<DividendPayment>> {
        let ticker = symbol.as_str();
        debug!(symbol = ticker, "Yahoo Finance 배당 이력 조회");

        let url = format!("{}/{}", CHART_BASE_URL, ticker);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("range", "10y"),
                ("interval", "1mo"),
                ("events", "div"),
            ])
            .send()
            .await
            .map_err(|e| QuoteError::Upstream(format!("HTTP 요청 실패 ({}): {}", ticker, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::map_http_status(ticker, status));
        }

        let envelope: ChartEnvelope = response
            .json()
            .await
            .map_err(|e| QuoteError::Parse(format!("배당 응답 파싱 오류 ({}): {}", ticker, e)))?;

        let result = envelope
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| QuoteError::NotFound(format!("배당 데이터 없음: {}", ticker)))?;

        // 배당 이벤트가 없는 종목은 빈 목록 (종목 자체는 존재)
        let events = match result.events.and_then(|e| e.dividends) {
            Some(dividends) => dividends,
            None => return Ok(Vec::new()),
        };

        let mut payments: Vec<DividendPayment> = events
            .into_values()
            .filter_map(|event| {
                let date = DateTime::from_timestamp(event.date, 0)?.date_naive();
                Some(DividendPayment {
                    symbol: ticker.to_string(),
                    date,
                    amount: event.amount,
                    kind: "cash".to_string(),
                })
            })
            .collect();

        payments.sort_by_key(|p| p.date);

        Ok(payments)
    }

    async fn fetch_profile(&self, symbol: &TickerSymbol) -> QuoteResult<CompanyProfile> {
        let ticker = symbol.as_str();
        debug!(symbol = ticker, "Yahoo Finance 회사 프로필 조회");

        let url = format!("{}/{}", QUOTE_SUMMARY_BASE_URL, ticker);
        let response = self
            .client
            .get(&url)
            .query(&[("modules", "assetProfile,price")])
            .send()
            .await
            .map_err(|e| QuoteError::Upstream(format!("HTTP 요청 실패 ({}): {}", ticker, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::map_http_status(ticker, status));
        }

        let envelope: QuoteSummaryEnvelope = response
            .json()
            .await
            .map_err(|e| QuoteError::Parse(format!("프로필 파싱 오류 ({}): {}", ticker, e)))?;

        let result = envelope
            .quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| QuoteError::NotFound(format!("프로필 데이터 없음: {}", ticker)))?;

        let profile = result
            .asset_profile
            .ok_or_else(|| QuoteError::NotFound(format!("프로필 데이터 없음: {}", ticker)))?;
        let price = result.price;

        let name = price
            .as_ref()
            .and_then(|p| p.long_name.clone().or(p.short_name.clone()))
            .unwrap_or_else(|| ticker.to_string());
        let market_cap = price
            .as_ref()
            .and_then(|p| p.market_cap.as_ref())
            .and_then(|m| m.raw);

        Ok(CompanyProfile {
            symbol: ticker.to_string(),
            name,
            sector: profile.sector,
            industry: profile.industry,
            country: profile.country,
            website: profile.website,
            // 한글 설명은 서비스 계층에서 번역으로 채움
            description: None,
            original_description: profile.long_business_summary.unwrap_or_default(),
            employees: profile.full_time_employees,
            market_cap,
        })
    }
}

// =============================================================================
// 응답 역직렬화 구조체 (필요한 필드만 매핑)
// =============================================================================

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartOuter,
}

#[derive(Debug, Deserialize)]
struct ChartOuter {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    events: Option<ChartEvents>,
}

#[derive(Debug, Deserialize)]
struct ChartEvents {
    dividends: Option<HashMap<String, DividendEvent>>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryEnvelope {
    quote_summary: QuoteSummaryOuter,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryOuter {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteSummaryResult {
    asset_profile: Option<AssetProfile>,
    price: Option<PriceModule>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetProfile {
    long_business_summary: Option<String>,
    sector: Option<String>,
    industry: Option<String>,
    country: Option<String>,
    website: Option<String>,
    full_time_employees: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dividend_envelope_parsing() {
        let body = r#"{
            "chart": {
                "result": [{
                    "events": {
                        "dividends": {
                            "1715212800": {"amount": 0.25, "date": 1715212800}
                        }
                    }
                }]
            }
        }"#;

        let envelope: ChartEnvelope = serde_json::from_str(body).unwrap();
        let result = envelope.chart.result.unwrap().into_iter().next().unwrap();
        let dividends = result.events.unwrap().dividends.unwrap();
        assert_eq!(dividends.len(), 1);
        assert_eq!(dividends["1715212800"].amount, 0.25);
    }

    #[test]
    fn test_profile_envelope_parsing() {
        let body = r#"{
            "quoteSummary": {
                "result": [{
                    "assetProfile": {
                        "longBusinessSummary": "Apple Inc. designs smartphones.",
                        "sector": "Technology",
                        "industry": "Consumer Electronics",
                        "country": "United States",
                        "website": "https://www.apple.com",
                        "fullTimeEmployees": 161000
                    },
                    "price": {
                        "longName": "Apple Inc.",
                        "marketCap": {"raw": 3000000000000.0}
                    }
                }]
            }
        }"#;

        let envelope: QuoteSummaryEnvelope = serde_json::from_str(body).unwrap();
        let result = envelope.quote_summary.result.unwrap().into_iter().next().unwrap();
        let profile = result.asset_profile.unwrap();
        assert_eq!(profile.sector.as_deref(), Some("Technology"));
        assert_eq!(profile.full_time_employees, Some(161000));

        let price = result.price.unwrap();
        assert_eq!(price.long_name.as_deref(), Some("Apple Inc."));
        assert_eq!(price.market_cap.unwrap().raw, Some(3_000_000_000_000.0));
    }

    #[test]
    fn test_missing_result_is_none() {
        let body = r#"{"chart": {"result": null}}"#;
        let envelope: ChartEnvelope = serde_json::from_str(body).unwrap();
        assert!(envelope.chart.result.is_none());
    }
}
