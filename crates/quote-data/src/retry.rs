//! 업스트림 호출 재시도 정책.
//!
//! 고정 sleep 대신 지수 백오프 + 지터를 사용하며, 시도 횟수와 전체
//! 데드라인을 모두 제한합니다. HTTP 429는 첫 대기부터 두 배로
//! 기다립니다.

use quote_core::{DataConfig, QuoteError, QuoteResult};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// 재시도 정책.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// 최대 시도 횟수 (첫 시도 포함)
    pub max_attempts: u32,
    /// 첫 재시도 대기 시간
    pub base_delay: Duration,
    /// 대기 시간 상한
    pub max_delay: Duration,
    /// 작업 1건의 전체 데드라인 (대기 시간 포함)
    pub deadline: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            deadline: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// 설정에서 재시도 정책을 생성합니다.
    pub fn from_config(config: &DataConfig) -> Self {
        Self {
            max_attempts: config.retry_max_attempts.max(1),
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            max_delay: Duration::from_millis(config.retry_max_delay_ms),
            deadline: Duration::from_secs(config.retry_deadline_secs),
        }
    }

    /// 작업을 재시도 정책에 따라 실행합니다.
    ///
    /// - 재시도 대상은 `QuoteError::is_retryable()`인 에러뿐입니다.
    ///   `NotFound`/`InvalidInput`은 즉시 반환됩니다.
    /// - 시도 횟수 한도 또는 데드라인에 도달하면 마지막 에러를
    ///   반환합니다.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> QuoteResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = QuoteResult<T>>,
    {
        let started = Instant::now();

        let mut attempt = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !err.is_retryable() || attempt >= self.max_attempts {
                        return Err(err);
                    }

                    let delay = self.delay_for(attempt, &err);
                    if started.elapsed() + delay >= self.deadline {
                        warn!(
                            attempt = attempt,
                            error = %err,
                            "재시도 데드라인 초과, 마지막 에러 반환"
                        );
                        return Err(err);
                    }

                    debug!(
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "업스트림 호출 재시도 예정"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// n번째 시도 이후의 대기 시간.
    ///
    /// 지수 백오프(base × 2^(n-1))에 ±50% 지터를 적용하고,
    /// 요청 한도 초과(429)는 기본 대기를 두 배로 시작합니다.
    fn delay_for(&self, attempt: u32, err: &QuoteError) -> Duration {
        let mut base = self.base_delay.as_millis() as u64;
        if matches!(err, QuoteError::RateLimited(_)) {
            base *= 2;
        }

        let exp = base.saturating_mul(1u64 << (attempt - 1).min(16));
        let capped = exp.min(self.max_delay.as_millis() as u64);

        let jittered = {
            let mut rng = rand::thread_rng();
            let factor: f64 = rng.gen_range(0.5..1.5);
            (capped as f64 * factor) as u64
        };

        Duration::from_millis(jittered.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            deadline: Duration::from_secs(60),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_first_attempt() {
        let calls = AtomicU32::new(0);
        let result = policy()
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, QuoteError>(7)
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_retryable_errors() {
        let calls = AtomicU32::new(0);
        let result = policy()
            .run(|| async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(QuoteError::Upstream("일시적 오류".to_string()))
                } else {
                    Ok(42)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_fails_fast() {
        let calls = AtomicU32::new(0);
        let result: QuoteResult<u32> = policy()
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(QuoteError::NotFound("ZZZZ".to_string()))
            })
            .await;

        assert!(matches!(result, Err(QuoteError::NotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_bound() {
        let calls = AtomicU32::new(0);
        let result: QuoteResult<u32> = policy()
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(QuoteError::RateLimited("429".to_string()))
            })
            .await;

        assert!(matches!(result, Err(QuoteError::RateLimited(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_bound() {
        let tight = RetryPolicy {
            max_attempts: 100,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
            deadline: Duration::from_secs(3),
        };

        let calls = AtomicU32::new(0);
        let result: QuoteResult<u32> = tight
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(QuoteError::Upstream("계속 실패".to_string()))
            })
            .await;

        assert!(result.is_err());
        // 데드라인(3초)에 막혀 100번을 다 돌지 못함
        assert!(calls.load(Ordering::SeqCst) < 10);
    }
}
