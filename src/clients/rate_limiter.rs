//! 请求限速器
//!
//! 令牌桶：每秒补充 `requests_per_second` 个令牌，最多积攒 `max_burst` 个。
//! 批量调研时所有任务共享同一个 `LlmClient`，因此也共享同一个桶。

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// 令牌桶限速器，`requests_per_second` 为 0 时不限速
pub struct RateLimiter {
    requests_per_second: f64,
    max_burst: f64,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    pub fn new(requests_per_second: f64, max_burst: usize) -> Self {
        let max_burst = max_burst.max(1) as f64;
        Self {
            requests_per_second: requests_per_second.max(0.0),
            max_burst,
            // 启动时桶是满的，允许一次突发
            bucket: Mutex::new(Bucket {
                tokens: max_burst,
                last_refill: Instant::now(),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.requests_per_second > 0.0
    }

    /// 取得一个令牌，桶空时等待补充
    pub async fn acquire(&self) {
        if !self.is_enabled() {
            return;
        }

        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
                bucket.tokens =
                    (bucket.tokens + elapsed * self.requests_per_second).min(self.max_burst);
                bucket.last_refill = now;

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }
                Duration::from_secs_f64((1.0 - bucket.tokens) / self.requests_per_second)
            };

            debug!("LLM 请求限速，等待 {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_burst_is_immediate_then_throttled() {
        let limiter = RateLimiter::new(20.0, 2);
        let start = std::time::Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(40));

        // 桶已空，再取两个至少要 2 / 20 秒
        limiter.acquire().await;
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn test_zero_rate_disables_limiting() {
        let limiter = RateLimiter::new(0.0, 1);
        assert!(!limiter.is_enabled());

        let start = std::time::Instant::now();
        for _ in 0..50 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(40));
    }
}
