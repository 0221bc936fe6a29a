//! 시장 데이터 값 레코드.
//!
//! 업스트림에서 수집한 데이터를 프론트엔드 JSON 형식(camelCase)으로
//! 표현하는 불변 레코드들입니다. 구성 후 변경되지 않습니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 주식 시세 스냅샷.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockInfo {
    /// 티커 심볼
    pub symbol: String,
    /// 회사명
    pub name: String,
    /// 현재가
    pub current_price: f64,
    /// 전일 종가
    pub previous_close: f64,
    /// 변동폭
    pub change: f64,
    /// 변동률 (%)
    pub change_percent: f64,
    /// 당일 고가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    /// 당일 저가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    /// 거래량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
    /// 시가총액
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
    /// PER
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_ratio: Option<f64>,
    /// 배당수익률 (%)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
    /// 베타
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
    /// 52주 고가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_high: Option<f64>,
    /// 52주 저가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fifty_two_week_low: Option<f64>,
    /// 평균 거래량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_volume: Option<i64>,
    /// 통화
    pub currency: String,
    /// 거래소
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    /// 섹터
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// 산업
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
}

impl StockInfo {
    /// 변동폭/변동률을 현재가와 전일 종가에서 다시 계산합니다.
    ///
    /// 변동률 계산은 이 메서드 한 곳에서만 수행됩니다.
    /// `previous_close`가 0 이하이면 변동률은 0입니다 (0으로 나누기 방지).
    pub fn with_computed_change(mut self) -> Self {
        self.change = self.current_price - self.previous_close;
        self.change_percent = if self.previous_close > 0.0 {
            self.change / self.previous_close * 100.0
        } else {
            0.0
        };
        self
    }
}

/// 차트의 단일 OHLCV 포인트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartPoint {
    /// 타임스탬프 (RFC 3339)
    pub timestamp: String,
    /// 시가
    pub open: f64,
    /// 고가
    pub high: f64,
    /// 저가
    pub low: f64,
    /// 종가
    pub close: f64,
    /// 거래량
    pub volume: i64,
}

/// 차트 시계열.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartSeries {
    /// 티커 심볼
    pub symbol: String,
    /// 조회 기간
    pub period: String,
    /// 조회 간격
    pub interval: String,
    /// OHLCV 포인트 목록
    pub data: Vec<ChartPoint>,
}

/// 단일 기간 재무 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    /// 티커 심볼
    pub symbol: String,
    /// 기간 (예: "TTM", "2024")
    pub period: String,
    /// 매출
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    /// 순이익
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_income: Option<f64>,
    /// 영업이익
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_income: Option<f64>,
}

/// 단일 배당 지급 내역.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DividendPayment {
    /// 티커 심볼
    pub symbol: String,
    /// 배당 기준일
    pub date: NaiveDate,
    /// 주당 배당금
    pub amount: f64,
    /// 배당 유형 (항상 "cash")
    #[serde(rename = "type")]
    pub kind: String,
}

/// 검색 결과 후보.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockSuggestion {
    /// 티커 심볼
    pub symbol: String,
    /// 회사명
    pub name: String,
    /// 거래소
    pub exchange: String,
    /// 종목 유형
    #[serde(rename = "type")]
    pub kind: String,
    /// 국가
    pub country: String,
}

/// 회사 프로필 (이중 언어 설명 포함).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    /// 티커 심볼
    pub symbol: String,
    /// 회사명
    pub name: String,
    /// 섹터
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    /// 산업
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// 국가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// 웹사이트
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// 한글 설명 (번역 실패 시 영문 원본)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// 영문 원본 설명
    pub original_description: String,
    /// 임직원 수
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<i64>,
    /// 시가총액
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<f64>,
}

/// 시가총액 랭킹 행.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarketCapEntry {
    /// 티커 심볼
    pub symbol: String,
    /// 회사명
    pub name: String,
    /// 현재가
    pub price: f64,
    /// 변동폭
    pub change: f64,
    /// 변동률 (%)
    pub change_percent: f64,
    /// 시가총액
    pub market_cap: f64,
    /// 거래량
    pub volume: i64,
}

impl From<&StockInfo> for MarketCapEntry {
    fn from(info: &StockInfo) -> Self {
        Self {
            symbol: info.symbol.clone(),
            name: info.name.clone(),
            price: info.current_price,
            change: info.change,
            change_percent: info.change_percent,
            market_cap: info.market_cap.unwrap_or(0.0),
            volume: info.volume.unwrap_or(0),
        }
    }
}
