//! 한글 검색어 지원.
//!
//! 한글 회사명 → 영문 회사명 매핑과 영문 → 한글 번역 클라이언트를
//! 제공합니다. 번역은 실패해도 원문을 그대로 돌려주며, 절대 에러를
//! 반환하지 않습니다.

use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// 한글 회사명 → 영문 회사명 매핑 테이블.
///
/// 사용자가 자주 검색하는 회사들의 큐레이션된 목록입니다.
static KOREAN_COMPANY_MAPPING: &[(&str, &str)] = &[
    // 기술 기업
    ("애플", "Apple"),
    ("구글", "Google"),
    ("알파벳", "Alphabet"),
    ("마이크로소프트", "Microsoft"),
    ("아마존", "Amazon"),
    ("테슬라", "Tesla"),
    ("메타", "Meta"),
    ("페이스북", "Facebook"),
    ("넷플릭스", "Netflix"),
    ("엔비디아", "NVIDIA"),
    ("인텔", "Intel"),
    ("어도비", "Adobe"),
    ("페이팔", "PayPal"),
    ("세일즈포스", "Salesforce"),
    // 금융 기업
    ("제이피모건", "JPMorgan"),
    ("뱅크오브아메리카", "Bank of America"),
    ("웰스파고", "Wells Fargo"),
    ("골드만삭스", "Goldman Sachs"),
    ("모건스탠리", "Morgan Stanley"),
    // 제조/소비재 기업
    ("존슨앤존슨", "Johnson & Johnson"),
    ("프록터앤갬블", "Procter & Gamble"),
    ("코카콜라", "Coca-Cola"),
    ("펩시", "Pepsi"),
    ("월마트", "Walmart"),
    ("홈디포", "Home Depot"),
    ("월트디즈니", "Walt Disney"),
    ("버라이즌", "Verizon"),
    // 기타 유명 기업
    ("버크셔해서웨이", "Berkshire Hathaway"),
    ("유나이티드헬스", "UnitedHealth"),
    ("비자", "Visa"),
    ("마스터카드", "Mastercard"),
    ("맥도날드", "McDonald's"),
    ("스타벅스", "Starbucks"),
    ("나이키", "Nike"),
    ("팔란티어", "Palantir"),
    ("팔란티어테크", "Palantir Technologies"),
];

/// 한글 검색어를 영문 회사명으로 변환합니다.
///
/// 정확히 일치하는 항목을 먼저 찾고, 없으면 양방향 부분 일치를
/// 시도합니다. 매핑이 없으면 원본을 그대로 반환합니다.
pub fn translate_korean_to_english(query: &str) -> String {
    let normalized = query.trim().to_lowercase();

    // 정확한 매칭
    for (korean, english) in KOREAN_COMPANY_MAPPING {
        if normalized == *korean {
            return (*english).to_string();
        }
    }

    // 부분 매칭
    for (korean, english) in KOREAN_COMPANY_MAPPING {
        if korean.contains(&normalized) || normalized.contains(korean) {
            return (*english).to_string();
        }
    }

    query.to_string()
}

/// 영문 → 한글 번역 클라이언트.
///
/// 무료 번역 엔드포인트를 사용하며 5초 타임아웃이 걸려 있습니다.
#[derive(Clone)]
pub struct Translator {
    client: Client,
    endpoint: String,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    /// 기본 엔드포인트로 번역 클라이언트를 생성합니다.
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: "https://translate.googleapis.com/translate_a/single".to_string(),
        }
    }

    /// 영문 텍스트를 한글로 번역합니다.
    ///
    /// 어떤 실패든 원문을 그대로 반환합니다. 빈 입력은 빈 문자열을
    /// 반환합니다.
    pub async fn translate_to_korean(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        match self.request_translation(text).await {
            Some(translated) if !translated.is_empty() => translated,
            _ => {
                debug!("번역 실패, 원문 반환");
                text.to_string()
            }
        }
    }

    async fn request_translation(&self, text: &str) -> Option<String> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "en"),
                ("tl", "ko"),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }

        // 응답 형식: [[["번역", "원문", ...], ...], ...]
        let body: serde_json::Value = response.json().await.ok()?;
        let segments = body.get(0)?.as_array()?;

        let translated: String = segments
            .iter()
            .filter_map(|segment| segment.get(0)?.as_str())
            .collect();

        Some(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert_eq!(translate_korean_to_english("애플"), "Apple");
        assert_eq!(translate_korean_to_english("엔비디아"), "NVIDIA");
        assert_eq!(translate_korean_to_english("팔란티어"), "Palantir");
    }

    #[test]
    fn test_substring_match() {
        // 검색어가 매핑 키를 포함
        assert_eq!(translate_korean_to_english("애플 주가"), "Apple");
        // 매핑 키가 검색어를 포함 (첫 번째 부분 일치가 우선)
        assert_eq!(translate_korean_to_english("팔란티어테"), "Palantir");
    }

    #[test]
    fn test_unmatched_passthrough() {
        assert_eq!(translate_korean_to_english("AAPL"), "AAPL");
        assert_eq!(translate_korean_to_english("없는회사"), "없는회사");
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(translate_korean_to_english("  테슬라  "), "Tesla");
    }
}
