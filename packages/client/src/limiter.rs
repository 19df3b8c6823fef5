//! Fixed-delay throttle applied before every outbound request.

use std::time::Duration;

/// Default delay between requests: 750 ms, roughly 4800 requests per hour,
/// comfortably inside the Congress.gov hourly budget.
pub const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(750);

/// Conservative stand-in for real rate-limit compliance: a fixed sleep
/// before each request, no burst allowance, no adaptive behavior. One shared
/// instance per pipeline.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay: Duration,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Block the calling task for the configured delay.
    pub async fn wait(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_wait_sleeps_for_configured_delay() {
        let limiter = RateLimiter::new(Duration::from_millis(750));
        let before = tokio::time::Instant::now();
        limiter.wait().await;
        assert_eq!(before.elapsed(), Duration::from_millis(750));
    }

    #[tokio::test]
    async fn test_zero_delay_returns_immediately() {
        let limiter = RateLimiter::new(Duration::ZERO);
        limiter.wait().await;
    }

    #[test]
    fn test_default_delay() {
        assert_eq!(RateLimiter::default().delay(), Duration::from_millis(750));
    }
}
