//! 차트 파라미터 타입.
//!
//! 차트 조회에 사용되는 기간/간격/타입 열거형을 정의합니다.
//! 문자열 형식은 업스트림 데이터 제공자의 range/interval 파라미터와
//! 동일합니다.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// 차트 기간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum ChartPeriod {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[default]
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "max")]
    Max,
}

impl ChartPeriod {
    /// 업스트림 range 파라미터 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartPeriod::OneDay => "1d",
            ChartPeriod::FiveDays => "5d",
            ChartPeriod::OneMonth => "1mo",
            ChartPeriod::ThreeMonths => "3mo",
            ChartPeriod::SixMonths => "6mo",
            ChartPeriod::OneYear => "1y",
            ChartPeriod::TwoYears => "2y",
            ChartPeriod::FiveYears => "5y",
            ChartPeriod::TenYears => "10y",
            ChartPeriod::YearToDate => "ytd",
            ChartPeriod::Max => "max",
        }
    }

    /// 기간에 해당하는 대략적인 일봉 개수.
    ///
    /// 합성 차트 생성 시 포인트 개수를 정할 때 사용합니다.
    pub fn approx_trading_days(&self) -> usize {
        match self {
            ChartPeriod::OneDay => 1,
            ChartPeriod::FiveDays => 5,
            ChartPeriod::OneMonth => 22,
            ChartPeriod::ThreeMonths => 66,
            ChartPeriod::SixMonths => 128,
            ChartPeriod::OneYear => 365,
            ChartPeriod::TwoYears => 730,
            ChartPeriod::FiveYears => 1825,
            ChartPeriod::TenYears => 3650,
            ChartPeriod::YearToDate => 180,
            ChartPeriod::Max => 3650,
        }
    }
}

impl fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 차트 간격.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum ChartInterval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "2m")]
    TwoMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "60m")]
    SixtyMinutes,
    #[serde(rename = "90m")]
    NinetyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1wk")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
}

impl ChartInterval {
    /// 업스트림 interval 파라미터 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartInterval::OneMinute => "1m",
            ChartInterval::TwoMinutes => "2m",
            ChartInterval::FiveMinutes => "5m",
            ChartInterval::FifteenMinutes => "15m",
            ChartInterval::ThirtyMinutes => "30m",
            ChartInterval::SixtyMinutes => "60m",
            ChartInterval::NinetyMinutes => "90m",
            ChartInterval::OneHour => "1h",
            ChartInterval::OneDay => "1d",
            ChartInterval::FiveDays => "5d",
            ChartInterval::OneWeek => "1wk",
            ChartInterval::OneMonth => "1mo",
            ChartInterval::ThreeMonths => "3mo",
        }
    }
}

impl fmt::Display for ChartInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 차트 렌더링 타입.
///
/// 프론트엔드 표시용 파라미터로, 데이터 조회 결과에는 영향을 주지
/// 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Line,
    Candlestick,
    Area,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_serde_forms() {
        let period: ChartPeriod = serde_json::from_str(r#""1mo""#).unwrap();
        assert_eq!(period, ChartPeriod::OneMonth);
        assert_eq!(serde_json::to_string(&ChartPeriod::OneYear).unwrap(), r#""1y""#);

        assert!(serde_json::from_str::<ChartPeriod>(r#""7y""#).is_err());
    }

    #[test]
    fn test_interval_serde_forms() {
        let interval: ChartInterval = serde_json::from_str(r#""1wk""#).unwrap();
        assert_eq!(interval, ChartInterval::OneWeek);
        assert_eq!(interval.as_str(), "1wk");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(ChartPeriod::default(), ChartPeriod::OneMonth);
        assert_eq!(ChartInterval::default(), ChartInterval::OneDay);
        assert_eq!(ChartType::default(), ChartType::Line);
    }

    #[test]
    fn test_chart_type_lowercase() {
        assert_eq!(
            serde_json::to_string(&ChartType::Candlestick).unwrap(),
            r#""candlestick""#
        );
    }
}
