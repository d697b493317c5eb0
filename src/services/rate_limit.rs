// src/services/rate_limit.rs
// DOCUMENTATION: Per-email throttling of login attempts
// PURPOSE: Slow down password guessing against a single account

use crate::errors::MarketplaceError;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

pub struct LoginRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl LoginRateLimiter {
    /// Allow `per_minute` attempts per email, replenished continuously
    pub fn new(per_minute: u32) -> Self {
        let quota = Quota::per_minute(NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN));
        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    /// Record an attempt for `email`; fails once the quota is used up
    pub fn check(&self, email: &str) -> Result<(), MarketplaceError> {
        let key = email.trim().to_lowercase();
        self.limiter.check_key(&key).map_err(|_| {
            log::warn!("Login rate limit exceeded for {}", key);
            MarketplaceError::RateLimitExceeded
        })
    }

    /// Forget keys whose quota has fully replenished
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
    }

    pub fn tracked_keys(&self) -> usize {
        self.limiter.len()
    }
}

/// Start background task that prunes idle keys
pub fn start_rate_limit_gc(limiter: Arc<LoginRateLimiter>, interval_seconds: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));

        loop {
            interval.tick().await;
            limiter.retain_recent();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trips_after_quota() {
        let limiter = LoginRateLimiter::new(3);
        for _ in 0..3 {
            assert!(limiter.check("fan@example.com").is_ok());
        }
        assert!(matches!(
            limiter.check(" FAN@example.com "),
            Err(MarketplaceError::RateLimitExceeded)
        ));
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = LoginRateLimiter::new(1);
        assert!(limiter.check("a@example.com").is_ok());
        assert!(limiter.check("b@example.com").is_ok());
        assert!(limiter.check("a@example.com").is_err());
        assert_eq!(limiter.tracked_keys(), 2);
    }

    #[test]
    fn test_zero_quota_falls_back_to_one() {
        let limiter = LoginRateLimiter::new(0);
        assert!(limiter.check("x@example.com").is_ok());
        assert!(limiter.check("x@example.com").is_err());
    }
}
