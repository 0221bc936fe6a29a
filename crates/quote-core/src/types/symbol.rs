//! 티커 심볼 타입.
//!
//! 미국 시장 티커 심볼을 나타내는 검증된 newtype을 정의합니다.
//! 허용 형식: 대문자 1~5자, 선택적으로 `-X` 한 글자 클래스 접미사
//! (예: `AAPL`, `BRK-B`).

use crate::error::QuoteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 검증된 티커 심볼.
///
/// 생성 시점에 형식이 검증되므로, 이 타입을 받는 코드는
/// 심볼 형식을 다시 검사할 필요가 없습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TickerSymbol(String);

impl TickerSymbol {
    /// 문자열에서 심볼을 파싱합니다.
    ///
    /// 입력은 먼저 대문자로 정규화됩니다 (`aapl` → `AAPL`).
    ///
    /// # Errors
    ///
    /// 형식이 `[A-Z]{1,5}(-[A-Z])?` 패턴을 벗어나면
    /// `QuoteError::InvalidInput`을 반환합니다.
    pub fn parse(input: &str) -> Result<Self, QuoteError> {
        let normalized = input.trim().to_uppercase();

        let (body, class) = match normalized.split_once('-') {
            Some((body, class)) => (body, Some(class)),
            None => (normalized.as_str(), None),
        };

        let body_valid =
            (1..=5).contains(&body.len()) && body.chars().all(|c| c.is_ascii_uppercase());
        let class_valid = match class {
            None => true,
            Some(c) => c.len() == 1 && c.chars().all(|c| c.is_ascii_uppercase()),
        };

        if body_valid && class_valid {
            Ok(Self(normalized))
        } else {
            Err(QuoteError::InvalidInput(format!(
                "잘못된 심볼 형식: {input}"
            )))
        }
    }

    /// 심볼 문자열을 반환합니다.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TickerSymbol {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TickerSymbol {
    type Error = QuoteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TickerSymbol> for String {
    fn from(symbol: TickerSymbol) -> Self {
        symbol.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
