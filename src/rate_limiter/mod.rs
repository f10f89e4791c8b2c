use std::time::Duration;
use tokio::time::sleep;

const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Spaces out requests to BoardGameGeek and bounds retries of queued requests
pub struct RateLimiter {
    delay: Duration,
    max_retries: u32,
    request_count: usize,
}

impl RateLimiter {
    pub fn new(delay_ms: u64, max_retries: u32) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            max_retries,
            request_count: 0,
        }
    }

    /// Sleeps before every request except the first one
    pub async fn wait(&mut self) {
        if self.should_wait() {
            self.apply_delay().await;
        }
        self.increment();
    }

    /// Whether a request answered with "accepted, come back later" may be sent again
    pub fn can_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    /// Extra pause before re-sending a queued request, doubling per attempt
    pub async fn backoff(&self, attempt: u32) {
        sleep(self.retry_delay(attempt)).await;
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.delay.saturating_mul(factor).min(MAX_BACKOFF)
    }

    #[cfg(test)]
    fn request_count(&self) -> usize {
        self.request_count
    }

    fn should_wait(&self) -> bool {
        self.request_count > 0
    }

    async fn apply_delay(&self) {
        sleep(self.delay).await;
    }

    fn increment(&mut self) {
        self.request_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_first_request_is_not_delayed() {
        let mut limiter = RateLimiter::new(200, 3);
        let start = Instant::now();
        limiter.wait().await;

        assert!(start.elapsed() < Duration::from_millis(200));
        assert_eq!(limiter.request_count(), 1);
    }

    #[tokio::test]
    async fn test_following_requests_are_delayed() {
        let mut limiter = RateLimiter::new(20, 3);
        limiter.wait().await;
        let start = Instant::now();
        limiter.wait().await;

        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(limiter.request_count(), 2);
    }

    #[test]
    fn test_retry_delay_doubles_up_to_cap() {
        let limiter = RateLimiter::new(2000, 10);
        assert_eq!(limiter.retry_delay(0), Duration::from_secs(2));
        assert_eq!(limiter.retry_delay(1), Duration::from_secs(4));
        assert_eq!(limiter.retry_delay(3), Duration::from_secs(16));
        assert_eq!(limiter.retry_delay(5), MAX_BACKOFF);
        assert_eq!(limiter.retry_delay(40), MAX_BACKOFF);
    }

    #[test]
    fn test_retries_are_bounded() {
        let limiter = RateLimiter::new(0, 2);
        assert!(limiter.can_retry(0));
        assert!(limiter.can_retry(1));
        assert!(!limiter.can_retry(2));
    }
}
