//! In-memory sliding-window rate limiter
//!
//! Used to throttle abuse-prone endpoints such as forgot-password.
//! Per-key request timestamps are kept in a shared map; a request is
//! allowed when fewer than `max_requests` timestamps fall inside the
//! window ending now.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    Allowed,
    Limited,
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed)
    }
}

/// Sliding-window limiter keyed by caller-chosen strings
#[derive(Clone)]
pub struct RateLimiter {
    window: Duration,
    max_requests: usize,
    hits: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            window,
            max_requests,
            hits: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record an attempt for `key` and report whether it is allowed
    pub fn check(&self, key: &str) -> RateLimitResult {
        let now = Instant::now();
        // Poisoned lock means another thread panicked mid-update; the
        // timestamp map is still structurally valid, so keep serving.
        let mut hits = self.hits.lock().unwrap_or_else(PoisonError::into_inner);

        let entry = hits.entry(key.to_string()).or_default();
        entry.retain(|t| now.duration_since(*t) < self.window);

        if entry.len() >= self.max_requests {
            return RateLimitResult::Limited;
        }

        entry.push(now);
        RateLimitResult::Allowed
    }

    /// Drop keys with no recent activity to keep the map bounded
    pub fn prune(&self) {
        let now = Instant::now();
        let mut hits = self.hits.lock().unwrap_or_else(PoisonError::into_inner);
        hits.retain(|_, times| {
            times.retain(|t| now.duration_since(*t) < self.window);
            !times.is_empty()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_requests_under_the_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert_eq!(limiter.check("a@x.com"), RateLimitResult::Allowed);
        }
    }

    #[test]
    fn blocks_requests_over_the_limit() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            limiter.check("a@x.com");
        }
        assert_eq!(limiter.check("a@x.com"), RateLimitResult::Limited);
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert_eq!(limiter.check("a@x.com"), RateLimitResult::Allowed);
        assert_eq!(limiter.check("b@x.com"), RateLimitResult::Allowed);
        assert_eq!(limiter.check("a@x.com"), RateLimitResult::Limited);
    }

    #[test]
    fn window_expiry_restores_allowance() {
        let limiter = RateLimiter::new(1, Duration::from_millis(20));
        assert_eq!(limiter.check("a@x.com"), RateLimitResult::Allowed);
        assert_eq!(limiter.check("a@x.com"), RateLimitResult::Limited);
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(limiter.check("a@x.com"), RateLimitResult::Allowed);
    }

    #[test]
    fn prune_drops_stale_keys() {
        let limiter = RateLimiter::new(5, Duration::from_millis(10));
        limiter.check("a@x.com");
        std::thread::sleep(Duration::from_millis(20));
        limiter.prune();
        let hits = limiter.hits.lock().unwrap();
        assert!(hits.is_empty());
    }
}
