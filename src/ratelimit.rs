use std::{sync::Arc, time::Duration};

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Spaces outbound requests by a minimum delay. The first `wait()` resolves
/// immediately; every later one resolves once `min_delay` has elapsed since
/// the previous request was released.
///
/// One instance belongs to one sync run. Sharing it across all calls of that
/// run is what guarantees global spacing against the remote; independent
/// runs own independent limiters and do not cross-throttle.
#[derive(Clone)]
pub struct RequestLimiter {
    inner: Arc<DirectLimiter>,
}

impl RequestLimiter {
    pub fn new(min_delay: Duration) -> Self {
        // Quota rejects a zero period; clamping keeps a no-delay config valid.
        let period = min_delay.max(Duration::from_millis(1));
        let quota = Quota::with_period(period).unwrap();
        Self { inner: Arc::new(RateLimiter::direct(quota)) }
    }

    pub async fn wait(&self) {
        self.inner.until_ready().await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[tokio::test]
    async fn first_call_does_not_block() {
        let limiter = RequestLimiter::new(Duration::from_millis(200));
        let start = Instant::now();
        limiter.wait().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn consecutive_calls_are_spaced() {
        let limiter = RequestLimiter::new(Duration::from_millis(80));
        limiter.wait().await;
        let start = Instant::now();
        limiter.wait().await;
        // The governor clock runs on real time, so allow scheduling slop.
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
