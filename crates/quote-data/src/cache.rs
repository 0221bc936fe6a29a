//! 인메모리 TTL 캐시.
//!
//! 모든 데이터 조회 경로가 업스트림에 가기 전에 거치는 키-값 저장소.
//! 엔트리별 TTL과 명시적인 용량 한도를 가지며, 전역 싱글턴이 아니라
//! 생성자가 주입하는 의존성입니다.
//!
//! 동시 요청이 같은 콜드 키를 조회하면 각각 업스트림을 호출할 수
//! 있습니다 (single-flight 없음). 마지막 쓰기가 남지만 양쪽 모두
//! 동등한 값을 계산하므로 문제되지 않습니다.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::warn;

/// 캐시 엔트리.
struct CacheEntry {
    value: serde_json::Value,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    /// `now - stored_at < ttl` 이면 유효합니다.
    fn is_fresh(&self) -> bool {
        self.stored_at.elapsed() < self.ttl
    }
}

/// 용량이 제한된 TTL 캐시.
pub struct QuoteCache {
    capacity: usize,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl QuoteCache {
    /// 지정한 용량의 캐시를 생성합니다.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// 캐시에서 값을 조회합니다.
    ///
    /// TTL이 지난 엔트리는 조회 시점에 제거되고 `None`을 반환합니다.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.is_fresh() => serde_json::from_value(entry.value.clone()).ok(),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// 값을 캐시에 저장합니다 (기존 엔트리는 덮어씀).
    ///
    /// 용량이 가득 차면 만료된 엔트리를 먼저 비우고, 그래도 자리가
    /// 없으면 가장 오래된 엔트리를 제거합니다.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!(key = key, error = %e, "캐시 값 직렬화 실패, 저장 생략");
                return;
            }
        };

        let mut entries = self.entries.write().await;
        if !entries.contains_key(key) && entries.len() >= self.capacity {
            Self::evict(&mut entries, self.capacity);
        }
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    /// 현재 엔트리 수를 반환합니다 (만료 여부 무관).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// 캐시가 비어 있는지 확인합니다.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// 만료 엔트리 제거 후, 필요하면 가장 오래된 엔트리를 제거합니다.
    fn evict(entries: &mut HashMap<String, CacheEntry>, capacity: usize) {
        entries.retain(|_, entry| entry.is_fresh());

        while entries.len() >= capacity {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    entries.remove(&key);
                }
                None => break,
            }
        }
    }

    /// 테스트에서 시간 경과를 흉내내기 위해 엔트리 저장 시각을
    /// 과거로 되돌립니다.
    #[cfg(test)]
    pub(crate) async fn backdate(&self, key: &str, age: Duration) {
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get_mut(key) {
            entry.stored_at = Instant::now() - age;
        }
    }
}

/// 캐시 키 생성.
///
/// 키는 작업 종류와 파라미터에서 결정론적으로 유도됩니다.
pub mod keys {
    use super::*;

    /// 단일 시세: `stock_info_{symbol}`
    pub fn stock_info(symbol: &str) -> String {
        format!("stock_info_{}", symbol)
    }

    /// 차트: `chart_{symbol}_{period}_{interval}`
    pub fn chart(symbol: &str, period: &str, interval: &str) -> String {
        format!("chart_{}_{}_{}", symbol, period, interval)
    }

    /// 재무 요약: `financials_{symbol}`
    pub fn financials(symbol: &str) -> String {
        format!("financials_{}", symbol)
    }

    /// 배당 이력: `dividends_{symbol}_{years}`
    pub fn dividends(symbol: &str, years: u32) -> String {
        format!("dividends_{}_{}", symbol, years)
    }

    /// 회사 프로필: `profile_{symbol}`
    pub fn profile(symbol: &str) -> String {
        format!("profile_{}", symbol)
    }

    /// 시가총액 랭킹: 고정 키
    pub fn top_market_cap() -> String {
        "top_market_cap_stocks".to_string()
    }

    /// 지수 구성 종목: `index_stocks_{name}`
    pub fn index_stocks(index_name: &str) -> String {
        format!("index_stocks_{}", index_name)
    }

    /// 배치 결과: `batch_stocks_{hash}` (정렬된 티커 목록의 해시)
    ///
    /// 티커 순서가 달라도 같은 집합이면 같은 키가 나옵니다.
    pub fn batch_stocks(tickers: &[String]) -> String {
        let mut sorted: Vec<&str> = tickers.iter().map(String::as_str).collect();
        sorted.sort_unstable();

        let mut hasher = DefaultHasher::new();
        sorted.hash(&mut hasher);
        format!("batch_stocks_{:x}", hasher.finish())
    }
}
